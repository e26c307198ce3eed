//! Solar states recorded ahead of time.
//!
//! [`RecordedEphemeris`] answers [`SolarEphemeris`] queries from a table of
//! `(JD TDB, SolarState)` pairs, matching the closest recorded epoch within a
//! tolerance. It replays earlier Horizons answers without network access and
//! serves as the ephemeris of the test suite.
//!
//! Tables can be loaded from CSV with a header row:
//!
//! ```text
//! jd_tdb,x,y,z,vx,vy,vz
//! 2458937.500800741,-676381.5546569857,989688.4902207577,436105.2280259226,-1227.67,-401.39,-136.46
//! ```
use std::io::Read;

use hifitime::Epoch;
use nalgebra::Vector3;
use serde::Deserialize;

use crate::{
    constants::JD,
    ephemeris::{SolarEphemeris, SolarState},
    orbprep_errors::OrbprepError,
    time::jd_tdb,
};

#[derive(Debug, Deserialize)]
struct RecordedRow {
    jd_tdb: JD,
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
}

/// Table of barycentric solar states keyed by JD TDB.
#[derive(Debug, Clone, Default)]
pub struct RecordedEphemeris {
    records: Vec<(JD, SolarState)>,
    /// Maximum distance (days) between a query and a recorded epoch
    tolerance_days: f64,
}

impl RecordedEphemeris {
    pub fn new(tolerance_days: f64) -> Self {
        RecordedEphemeris {
            records: Vec::new(),
            tolerance_days,
        }
    }

    /// Builder form of [`Self::insert`].
    pub fn with_record(mut self, jd_tdb: JD, state: SolarState) -> Self {
        self.insert(jd_tdb, state);
        self
    }

    pub fn insert(&mut self, jd_tdb: JD, state: SolarState) {
        self.records.push((jd_tdb, state));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load a table from CSV (header `jd_tdb,x,y,z,vx,vy,vz`, km and km/day).
    ///
    /// Errors
    /// ----------
    /// * [`OrbprepError::MalformedRecord`] – a row cannot be read.
    pub fn from_csv_reader<R: Read>(reader: R, tolerance_days: f64) -> Result<Self, OrbprepError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut ephem = RecordedEphemeris::new(tolerance_days);
        for row in csv_reader.deserialize::<RecordedRow>() {
            let row = row.map_err(|e| OrbprepError::malformed("recorded ephemeris", e.to_string()))?;
            ephem.insert(
                row.jd_tdb,
                SolarState {
                    position: Vector3::new(row.x, row.y, row.z),
                    velocity: Vector3::new(row.vx, row.vy, row.vz),
                },
            );
        }
        Ok(ephem)
    }

    /// Recorded state closest to `jd`, if within the tolerance.
    pub fn lookup(&self, jd: JD) -> Option<&SolarState> {
        self.records
            .iter()
            .map(|(t, state)| ((t - jd).abs(), state))
            .filter(|(dt, _)| *dt <= self.tolerance_days)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, state)| state)
    }
}

impl SolarEphemeris for RecordedEphemeris {
    fn solar_state_at(&self, epoch_tdb: Epoch) -> Result<SolarState, OrbprepError> {
        let jd = jd_tdb(&epoch_tdb);
        self.lookup(jd)
            .cloned()
            .ok_or(OrbprepError::EpochNotRecorded(jd))
    }
}
