use thiserror::Error;

use crate::ref_system::Frame;

#[derive(Error, Debug)]
pub enum OrbprepError {
    #[error("Required argument '{0}' not found")]
    MissingArgument(&'static str),

    #[error("Malformed record in {source_name}: {reason}")]
    MalformedRecord { source_name: String, reason: String },

    #[error("Unsupported element dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Unknown element file type: {0}")]
    InvalidDialect(String),

    #[error("No {0} state in the element set, run the frame transform first")]
    MissingFrame(Frame),

    #[error("Frame mismatch: expected a {expected} state, got {found}")]
    FrameMismatch { expected: String, found: Frame },

    #[error("Ephemeris service unavailable after {attempts} attempt(s): {reason}")]
    EphemerisUnavailable { attempts: usize, reason: String },

    #[error("Unexpected ephemeris service response: {0}")]
    EphemerisResponse(String),

    #[error("No recorded solar state at JD {0} TDB")]
    EpochNotRecorded(f64),

    #[error("Particles have different epochs: {first} and {other} (JD TDB)")]
    EpochMismatch { first: f64, other: f64 },

    #[error("Output path used by more than one object: {0}")]
    DuplicateOutputPath(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),
}

impl OrbprepError {
    pub(crate) fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        OrbprepError::MalformedRecord {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Failures worth another attempt: transport errors and 5xx answers.
    pub fn is_transient(&self) -> bool {
        match self {
            OrbprepError::UreqHttpError(err) => match err {
                ureq::Error::StatusCode(code) => *code >= 500,
                ureq::Error::Io(_)
                | ureq::Error::Timeout(_)
                | ureq::Error::HostNotFound
                | ureq::Error::ConnectionFailed => true,
                _ => false,
            },
            OrbprepError::IoError(_) => true,
            _ => false,
        }
    }
}

impl PartialEq for OrbprepError {
    fn eq(&self, other: &Self) -> bool {
        use OrbprepError::*;
        match (self, other) {
            (MissingArgument(a), MissingArgument(b)) => a == b,
            (
                MalformedRecord {
                    source_name: s1,
                    reason: r1,
                },
                MalformedRecord {
                    source_name: s2,
                    reason: r2,
                },
            ) => s1 == s2 && r1 == r2,
            (UnsupportedDialect(a), UnsupportedDialect(b)) => a == b,
            (InvalidDialect(a), InvalidDialect(b)) => a == b,
            (MissingFrame(a), MissingFrame(b)) => a == b,
            (
                FrameMismatch {
                    expected: e1,
                    found: f1,
                },
                FrameMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (
                EphemerisUnavailable {
                    attempts: a1,
                    reason: r1,
                },
                EphemerisUnavailable {
                    attempts: a2,
                    reason: r2,
                },
            ) => a1 == a2 && r1 == r2,
            (EphemerisResponse(a), EphemerisResponse(b)) => a == b,
            (EpochNotRecorded(a), EpochNotRecorded(b)) => a == b,
            (
                EpochMismatch {
                    first: f1,
                    other: o1,
                },
                EpochMismatch {
                    first: f2,
                    other: o2,
                },
            ) => f1 == f2 && o1 == o2,
            (DuplicateOutputPath(a), DuplicateOutputPath(b)) => a == b,

            // io errors are not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (UreqHttpError(_), UreqHttpError(_)) => true,

            _ => false,
        }
    }
}

#[cfg(test)]
mod orbprep_errors_test {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(OrbprepError::UreqHttpError(ureq::Error::StatusCode(503)).is_transient());
        assert!(OrbprepError::UreqHttpError(ureq::Error::ConnectionFailed).is_transient());
        assert!(OrbprepError::from(std::io::Error::other("reset")).is_transient());

        assert!(!OrbprepError::UreqHttpError(ureq::Error::StatusCode(404)).is_transient());
        assert!(!OrbprepError::EphemerisResponse("Cannot interpret date".into()).is_transient());
        assert!(!OrbprepError::EpochNotRecorded(2458849.5).is_transient());
    }
}
