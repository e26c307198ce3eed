//! # Configuration
//!
//! Typed settings of the pipeline. Every struct implements [`Default`] with the
//! values used by the n-body wrapper, and [`serde::Deserialize`] so that a
//! caller can load them from any serde format. Missing fields take their
//! default.
use std::{thread, time::Duration};

use log::warn;
use serde::Deserialize;

use crate::orbprep_errors::OrbprepError;

/// Longest wait between two attempts, whatever the policy.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Bounded retry with exponential backoff for the ephemeris service.
///
/// Only transient failures ([`OrbprepError::is_transient`]) are retried.
///
/// Fields
/// -----------------
/// * `max_retries` – retries after the first attempt (0 means a single attempt).
/// * `initial_backoff` – wait before the first retry.
/// * `multiplier` – factor applied to the wait after each retry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub initial_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy making exactly one attempt.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (0-based), capped at [`MAX_BACKOFF`].
    pub fn backoff(&self, retry: usize) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let factor = self.multiplier.max(1.0).powi(exponent);
        Duration::try_from_secs_f64(self.initial_backoff.as_secs_f64() * factor)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }

    /// Run `op` until it succeeds, fails for good or the retries are exhausted.
    ///
    /// Return
    /// ----------
    /// * the first success of `op`.
    ///
    /// Errors
    /// ----------
    /// * a non-transient error of `op`, returned at once.
    /// * [`OrbprepError::EphemerisUnavailable`] – every attempt failed with a
    ///   transient error; the last one is the reason.
    pub fn run<T, F>(&self, mut op: F) -> Result<T, OrbprepError>
    where
        F: FnMut() -> Result<T, OrbprepError>,
    {
        let attempts = self.max_retries.saturating_add(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match op() {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) => err,
            };
            if attempt >= attempts {
                return Err(OrbprepError::EphemerisUnavailable {
                    attempts,
                    reason: err.to_string(),
                });
            }
            let wait = self.backoff(attempt - 1);
            warn!("Attempt {attempt}/{attempts} failed ({err}), retrying in {wait:?}");
            thread::sleep(wait);
        }
    }
}

/// Access to the JPL Horizons API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HorizonsConfig {
    pub url: String,
    /// Global timeout of one request
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for HorizonsConfig {
    fn default() -> Self {
        HorizonsConfig {
            url: "https://ssd.jpl.nasa.gov/api/horizons.api".to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// Integration settings written in the initial-conditions file.
///
/// Fields
/// -----------------
/// * `tstep` – integrator step (days).
/// * `trange` – integration span (days).
/// * `geocentric` – whether the integrator works around the Earth.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub tstep: f64,
    pub trange: f64,
    pub geocentric: bool,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        IntegrationConfig {
            tstep: 20.0,
            trange: 600.0,
            geocentric: false,
        }
    }
}

#[cfg(test)]
mod config_test {
    use super::*;
    use std::cell::Cell;

    fn unavailable() -> OrbprepError {
        OrbprepError::UreqHttpError(ureq::Error::StatusCode(503))
    }

    fn fast_policy(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            multiplier: 2.0,
        }
    }

    #[test]
    fn test_defaults() {
        let horizons = HorizonsConfig::default();
        assert_eq!(horizons.timeout, Duration::from_secs(10));
        assert_eq!(horizons.retry.max_retries, 2);

        let integration = IntegrationConfig::default();
        assert_eq!(integration.tstep, 20.0);
        assert_eq!(integration.trange, 600.0);
        assert!(!integration.geocentric);
    }

    #[test]
    fn test_backoff_grows() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_retries: 100_000,
            initial_backoff: Duration::from_secs(1),
            multiplier: 10.0,
        };
        assert_eq!(policy.backoff(10), MAX_BACKOFF);
        assert_eq!(policy.backoff(10_000), MAX_BACKOFF);
        assert_eq!(policy.backoff(usize::MAX), MAX_BACKOFF);
    }

    #[test]
    fn test_retry_succeeds_after_failures() {
        let calls = Cell::new(0);
        let result = fast_policy(2).run(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(unavailable())
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_retry_exhausted() {
        let calls = Cell::new(0);
        let result: Result<(), _> = fast_policy(1).run(|| {
            calls.set(calls.get() + 1);
            Err(unavailable())
        });
        assert_eq!(
            result.unwrap_err(),
            OrbprepError::EphemerisUnavailable {
                attempts: 2,
                reason: unavailable().to_string(),
            }
        );
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_client_error_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = fast_policy(3).run(|| {
            calls.set(calls.get() + 1);
            Err(OrbprepError::UreqHttpError(ureq::Error::StatusCode(404)))
        });
        assert_eq!(calls.get(), 1);
        assert!(matches!(
            result.unwrap_err(),
            OrbprepError::UreqHttpError(ureq::Error::StatusCode(404))
        ));
    }

    #[test]
    fn test_unreadable_answer_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = fast_policy(3).run(|| {
            calls.set(calls.get() + 1);
            Err(OrbprepError::EphemerisResponse("no $$SOE/$$EOE block".into()))
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(
            result.unwrap_err(),
            OrbprepError::EphemerisResponse("no $$SOE/$$EOE block".into())
        );
    }

    #[test]
    fn test_no_retry() {
        let calls = Cell::new(0);
        let _: Result<(), _> = RetryPolicy::none().run(|| {
            calls.set(calls.get() + 1);
            Err(unavailable())
        });
        assert_eq!(calls.get(), 1);
    }
}
