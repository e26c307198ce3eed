//! # Constants and type definitions for orbprep
//!
//! This module centralizes the **physical constants**, **conversion factors**, the
//! **OrbFit layout markers**, and the common identifiers used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, J2000 epoch)
//! - Unit conversions (arcseconds ↔ radians, MJD ↔ JD)
//! - Literal markers of the OrbFit `.fel`/`.eq` Cartesian block
//! - Core type aliases and the [`ObjectNumber`] identifier

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Astronomical Unit in kilometers (IAU 2012, exact by definition)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

// -------------------------------------------------------------------------------------------------
// OrbFit layout
// -------------------------------------------------------------------------------------------------

/// Header line opening the Cartesian state block of an OrbFit file.
pub const CARTESIAN_MARKER: &str = "! Cartesian position and velocity vectors";

/// Line marking the end of the OrbFit file header; the object name follows it.
pub const END_OF_HEADER: &str = "END_OF_HEADER";

/// Prefix of the covariance rows inside the Cartesian block.
pub const COV_PREFIX: &str = " COV";

/// Prefix of the epoch line inside an OrbFit element block.
pub const MJD_PREFIX: &str = " MJD";

/// Number of lines read after (and including) the Cartesian marker.
pub const CARTESIAN_BLOCK_WINDOW: usize = 25;

/// Number of covariance rows of a fully defined 6×6 matrix.
pub const COV_ROWS: usize = 7;

/// Number of distinct entries of a symmetric 6×6 matrix.
pub const COV_ENTRIES: usize = 21;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Julian Date (days)
pub type JD = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

// -------------------------------------------------------------------------------------------------
// Identifiers
// -------------------------------------------------------------------------------------------------

/// Identifier of a solar system object.
///
/// This can be:
/// - An asteroid number (e.g. `Int(30101)`)
/// - A provisional designation or any other name (e.g. `"2015AB"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectNumber {
    /// Integer-based MPC designation (e.g. 1, 433…)
    Int(u32),
    /// String-based designation (provisional, comet, file stem…)
    String(String),
}

impl std::fmt::Display for ObjectNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectNumber::Int(n) => write!(f, "{n}"),
            ObjectNumber::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for ObjectNumber {
    fn from(n: u32) -> Self {
        ObjectNumber::Int(n)
    }
}

impl From<&str> for ObjectNumber {
    /// Pure digits become `Int`, anything else is kept verbatim.
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<u32>() {
            Ok(n) => ObjectNumber::Int(n),
            Err(_) => ObjectNumber::String(s.to_string()),
        }
    }
}
