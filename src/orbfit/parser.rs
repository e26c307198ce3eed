//! # Orbit file parser
//!
//! [`OrbitFileParser`] turns an element file into an [`ElementSet`] holding a
//! single **heliocentric-ecliptic** [`CartesianState`] and its covariance.
//!
//! ## Dialects
//! -----------------
//! * [`Dialect::OrbFit`] – `.fel` / `.eq` files written by OrbFit.
//! * [`Dialect::Ele220`] – compact one-line elements. The field layout of this
//!   dialect is not defined yet, so parsing it fails with
//!   [`OrbprepError::UnsupportedDialect`].
//!
//! ## Missing data
//! -----------------
//! * No Cartesian block in the file: the element set is returned **without**
//!   state and a warning is logged. Writing it later fails with
//!   [`OrbprepError::MissingFrame`].
//! * Covariance rows missing or incomplete: [`Covariance::Absent`](crate::covariance::Covariance::Absent).
use std::str::FromStr;

use camino::Utf8Path;
use hifitime::Epoch;
use log::{debug, warn};

use crate::{
    cartesian_state::CartesianState,
    constants::{ObjectNumber, CARTESIAN_BLOCK_WINDOW, CARTESIAN_MARKER, END_OF_HEADER, MJD_PREFIX},
    element_set::ElementSet,
    orbfit::{
        covariance_decoder::decode_covariance,
        labelled_values, mjd_epoch,
        record_reader::{find_last, read_lines, split_lines, window_at},
    },
    orbprep_errors::OrbprepError,
    ref_system::Frame,
};

/// Input element dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    OrbFit,
    Ele220,
}

impl FromStr for Dialect {
    type Err = OrbprepError;

    /// Accepts the file types used on the command line of the n-body wrapper:
    /// `fel`, `eq` (OrbFit) and `ele220`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fel" | "eq" | "orbfit" => Ok(Dialect::OrbFit),
            "ele220" => Ok(Dialect::Ele220),
            other => Err(OrbprepError::InvalidDialect(other.to_string())),
        }
    }
}

/// Parser for heliocentric-ecliptic element files.
#[derive(Debug, Clone)]
pub struct OrbitFileParser {
    /// Lines read after the Cartesian marker (marker included)
    window: usize,
}

impl Default for OrbitFileParser {
    fn default() -> Self {
        OrbitFileParser {
            window: CARTESIAN_BLOCK_WINDOW,
        }
    }
}

impl OrbitFileParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an element file.
    ///
    /// Arguments
    /// -----------------
    /// * `path` – path of the element file; `None` is rejected.
    /// * `dialect` – format of the file.
    ///
    /// Return
    /// ----------
    /// * An [`ElementSet`] holding at most one heliocentric-ecliptic state.
    ///
    /// Errors
    /// ----------
    /// * [`OrbprepError::MissingArgument`] – no path given.
    /// * [`OrbprepError::UnsupportedDialect`] – `ele220` input.
    /// * [`OrbprepError::MalformedRecord`] – the state row is not 6 numbers, or no epoch.
    /// * [`OrbprepError::IoError`] – the file cannot be read.
    pub fn parse(&self, path: Option<&Utf8Path>, dialect: Dialect) -> Result<ElementSet, OrbprepError> {
        let path = path.ok_or(OrbprepError::MissingArgument("input file"))?;

        if dialect == Dialect::Ele220 {
            return Err(unsupported_ele220());
        }

        debug!("Parsing {path} as {dialect:?}");
        let lines = read_lines(path)?;
        let fallback_id = path.file_stem().unwrap_or(path.as_str());
        let set = self.parse_orbfit_lines(&lines, fallback_id)?;
        Ok(set.with_source(path))
    }

    /// Parse element file contents already in memory.
    ///
    /// `fallback_id` names the object when the file header does not.
    pub fn parse_str(
        &self,
        contents: &str,
        dialect: Dialect,
        fallback_id: &str,
    ) -> Result<ElementSet, OrbprepError> {
        match dialect {
            Dialect::OrbFit => self.parse_orbfit_lines(&split_lines(contents), fallback_id),
            Dialect::Ele220 => Err(unsupported_ele220()),
        }
    }

    fn parse_orbfit_lines(
        &self,
        lines: &[String],
        fallback_id: &str,
    ) -> Result<ElementSet, OrbprepError> {
        let object = object_name(lines).unwrap_or_else(|| ObjectNumber::from(fallback_id));
        let source_name = object.to_string();

        let Some(start) = find_last(lines, CARTESIAN_MARKER) else {
            warn!("No Cartesian elements in {source_name}, element set left empty");
            return Ok(ElementSet::new(object));
        };
        let block = window_at(lines, start, self.window);

        let state_line = block
            .iter()
            .skip(1)
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| OrbprepError::malformed(&source_name, "no state row after the Cartesian marker"))?;

        let (_, values) =
            labelled_values(state_line).map_err(|reason| OrbprepError::malformed(&source_name, reason))?;
        let values: [f64; 6] = values.try_into().map_err(|values: Vec<f64>| {
            OrbprepError::malformed(
                &source_name,
                format!("state row holds {} numeric fields, expected 6", values.len()),
            )
        })?;

        let epoch = block_epoch(lines, start, block, &source_name)?;
        let covariance = decode_covariance(block, &source_name)?;

        let state = CartesianState::from_array(values, Frame::HELIO_ECLIPTIC, epoch);
        Ok(ElementSet::from_parse(object, state, covariance))
    }
}

fn unsupported_ele220() -> OrbprepError {
    OrbprepError::UnsupportedDialect("ele220 parsing is not implemented".into())
}

/// Object designation: first non-comment line after `END_OF_HEADER`.
fn object_name(lines: &[String]) -> Option<ObjectNumber> {
    let header_end = lines.iter().position(|line| line.trim() == END_OF_HEADER)?;
    lines[header_end + 1..]
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty() && !line.starts_with('!'))
        .and_then(|line| line.split_whitespace().next())
        .map(ObjectNumber::from)
}

/// Epoch of the Cartesian block: its own ` MJD` row, otherwise the last one
/// written before the block.
fn block_epoch(
    lines: &[String],
    start: usize,
    block: &[String],
    source_name: &str,
) -> Result<Epoch, OrbprepError> {
    let mjd_line = block
        .iter()
        .skip(1)
        .find(|line| line.starts_with(MJD_PREFIX))
        .or_else(|| {
            lines[..start]
                .iter()
                .rev()
                .find(|line| line.starts_with(MJD_PREFIX))
        })
        .ok_or_else(|| OrbprepError::malformed(source_name, "no epoch (MJD) row"))?;

    mjd_epoch(mjd_line).map_err(|reason| OrbprepError::malformed(source_name, reason))
}

#[cfg(test)]
mod parser_test {
    use super::*;
    use crate::{cartesian_state::Component, time::jd_tdb};
    use approx::assert_relative_eq;
    use hifitime::TimeScale;
    use rstest::rstest;

    const HEADER: &str = "format  = 'OEF2.0'       ! file format
rectype = 'ML'           ! record type (1L/ML)
refsys  = ECLM J2000     ! default reference system
END_OF_HEADER
2015AB
! Equinoctial elements: a, e*sin(LP), e*cos(LP), tan(i/2)*sin(LN), tan(i/2)*cos(LN), mean long.
 EQU   1.000567426710232E+00  0.012013813183810  0.012513049131508  0.000000018498370  0.000000212838090 180.6497493458393
 MJD     58936.999199216 TDT
";

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("eq".parse::<Dialect>().unwrap(), Dialect::OrbFit);
        assert_eq!("FEL".parse::<Dialect>().unwrap(), Dialect::OrbFit);
        assert_eq!("ele220".parse::<Dialect>().unwrap(), Dialect::Ele220);
        assert_eq!(
            "mpc80".parse::<Dialect>().unwrap_err(),
            OrbprepError::InvalidDialect("mpc80".into())
        );
    }

    #[test]
    fn test_missing_path() {
        let err = OrbitFileParser::new().parse(None, Dialect::OrbFit).unwrap_err();
        assert_eq!(err, OrbprepError::MissingArgument("input file"));
    }

    #[test]
    fn test_ele220_is_not_supported() {
        let parser = OrbitFileParser::new();
        let err = parser
            .parse(Some(Utf8Path::new("30101.ele220")), Dialect::Ele220)
            .unwrap_err();
        assert!(matches!(err, OrbprepError::UnsupportedDialect(_)));
        assert!(matches!(
            parser.parse_str("anything", Dialect::Ele220, "30101"),
            Err(OrbprepError::UnsupportedDialect(_))
        ));
    }

    #[test]
    fn test_no_cartesian_block() {
        let set = OrbitFileParser::new()
            .parse_str(HEADER, Dialect::OrbFit, "fallback")
            .unwrap();
        assert_eq!(set.object(), &ObjectNumber::String("2015AB".into()));
        assert!(set.states().is_empty());
        assert!(!set.covariance().is_present());
    }

    #[test]
    fn test_epoch_falls_back_to_previous_mjd_row() {
        let text = format!(
            "{HEADER}! Cartesian position and velocity vectors\n CAR 1.0 0.5 0.1 0.001 0.002 0.0003\n"
        );
        let set = OrbitFileParser::new()
            .parse_str(&text, Dialect::OrbFit, "fallback")
            .unwrap();
        let state = &set.states()[0];
        assert_eq!(state.frame(), Frame::HELIO_ECLIPTIC);
        assert_eq!(state.epoch().time_scale, TimeScale::TT);
        assert_eq!(state[Component::Vz], 0.0003);
    }

    #[rstest]
    #[case::tdt("TDT", TimeScale::TT, 2458937.499199235)]
    #[case::tdb("TDB", TimeScale::TDB, 2458937.499199216)]
    #[case::utc("UTC", TimeScale::UTC, 2458937.499999976)]
    fn test_block_epoch_scale(#[case] token: &str, #[case] scale: TimeScale, #[case] jd: f64) {
        let text = format!(
            "! Cartesian position and velocity vectors\n CAR 1.0 0.5 0.1 0.001 0.002 0.0003\n MJD     58936.999199216 {token}\n"
        );
        let set = OrbitFileParser::new()
            .parse_str(&text, Dialect::OrbFit, "30101")
            .unwrap();
        let epoch = set.states()[0].epoch();
        assert_eq!(epoch.time_scale, scale);
        assert_relative_eq!(jd_tdb(&epoch), jd, epsilon = 1e-7);
    }

    #[test]
    fn test_state_row_with_five_fields() {
        let text = format!(
            "{HEADER}! Cartesian position and velocity vectors\n CAR 1.0 0.5 0.1 0.001 0.002\n"
        );
        let err = OrbitFileParser::new()
            .parse_str(&text, Dialect::OrbFit, "fallback")
            .unwrap_err();
        assert_eq!(
            err,
            OrbprepError::malformed("2015AB", "state row holds 5 numeric fields, expected 6")
        );
    }

    #[test]
    fn test_missing_epoch() {
        let text = "! Cartesian position and velocity vectors\n CAR 1.0 0.5 0.1 0.001 0.002 0.003\n";
        let err = OrbitFileParser::new()
            .parse_str(text, Dialect::OrbFit, "K25D50B")
            .unwrap_err();
        assert_eq!(err, OrbprepError::malformed("K25D50B", "no epoch (MJD) row"));
    }
}
