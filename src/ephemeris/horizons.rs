//! Live solar ephemeris from the JPL Horizons API.
//!
//! One blocking GET request per epoch, on a shared [`ureq::Agent`] with a global
//! timeout. Transport failures and 5xx answers are retried according to the
//! [`RetryPolicy`](crate::config::RetryPolicy) of the configuration; other HTTP
//! errors and answers that cannot be read are reported at once.
//!
//! The query asks for the vector table of the Sun (`COMMAND='10'`) seen from the
//! solar system barycenter (`CENTER='500@0'`), ICRF axes, km and km/day, TDB:
//!
//! ```text
//! $$SOE
//! 2458937.500800741, A.D. 2020-Mar-29 00:01:09.1840, -6.76381554656985E+05, ...
//! $$EOE
//! ```
use std::sync::LazyLock;

use csv::{ReaderBuilder, Trim};
use hifitime::Epoch;
use itertools::Itertools;
use log::debug;
use nalgebra::Vector3;
use regex::Regex;
use ureq::Agent;

use crate::{
    config::HorizonsConfig,
    constants::JD,
    ephemeris::{SolarEphemeris, SolarState},
    orbprep_errors::OrbprepError,
    time::jd_tdb,
};

static DATA_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$SOE\s*(.*?)\s*\$\$EOE").expect("valid regex"));

/// One row of a Horizons CSV vector table (`VEC_TABLE='2'`).
#[derive(Debug, serde::Deserialize, PartialEq)]
struct VectorRow {
    jd_tdb: JD,
    _calendar_date: String,
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
}

impl From<VectorRow> for SolarState {
    fn from(row: VectorRow) -> Self {
        SolarState {
            position: Vector3::new(row.x, row.y, row.z),
            velocity: Vector3::new(row.vx, row.vy, row.vz),
        }
    }
}

/// Solar ephemeris backed by the JPL Horizons API.
#[derive(Debug, Clone)]
pub struct HorizonsEphemeris {
    agent: Agent,
    config: HorizonsConfig,
}

impl Default for HorizonsEphemeris {
    fn default() -> Self {
        Self::new(HorizonsConfig::default())
    }
}

impl HorizonsEphemeris {
    pub fn new(config: HorizonsConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build()
            .into();
        HorizonsEphemeris { agent, config }
    }

    /// Query parameters for a single JD TDB epoch.
    fn query_params(jd: JD) -> Vec<(&'static str, String)> {
        vec![
            ("format", "text".to_string()),
            ("COMMAND", "'10'".to_string()),
            ("CENTER", "'500@0'".to_string()),
            ("OBJ_DATA", "'NO'".to_string()),
            ("MAKE_EPHEM", "'YES'".to_string()),
            ("EPHEM_TYPE", "'VECTORS'".to_string()),
            ("TLIST", format!("'{jd:.9}'")),
            ("TLIST_TYPE", "'JD'".to_string()),
            ("TIME_TYPE", "'TDB'".to_string()),
            ("OUT_UNITS", "'KM-D'".to_string()),
            ("REF_SYSTEM", "'ICRF'".to_string()),
            ("REF_PLANE", "'FRAME'".to_string()),
            ("VEC_TABLE", "'2'".to_string()),
            ("CSV_FORMAT", "'YES'".to_string()),
        ]
    }

    fn fetch(&self, jd: JD) -> Result<String, OrbprepError> {
        let params = Self::query_params(jd);
        debug!(
            "Horizons query: {}",
            params.iter().map(|(k, v)| format!("{k}={v}")).join("&")
        );
        self.agent
            .get(self.config.url.as_str())
            .query_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .call()?
            .body_mut()
            .read_to_string()
            .map_err(OrbprepError::from)
    }
}

impl SolarEphemeris for HorizonsEphemeris {
    fn solar_state_at(&self, epoch_tdb: Epoch) -> Result<SolarState, OrbprepError> {
        let jd = jd_tdb(&epoch_tdb);
        let body = self.config.retry.run(|| self.fetch(jd))?;
        let mut rows = parse_vector_response(&body)?;
        if rows.len() != 1 {
            return Err(OrbprepError::EphemerisResponse(format!(
                "expected one vector row for JD {jd}, got {}",
                rows.len()
            )));
        }
        let row = rows.remove(0);
        debug!("Solar state at JD {} TDB received", row.jd_tdb);
        Ok(row.into())
    }
}

/// Extract the rows between `$$SOE` and `$$EOE` of a CSV vector table.
fn parse_vector_response(body: &str) -> Result<Vec<VectorRow>, OrbprepError> {
    let data = DATA_BLOCK
        .captures(body)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| {
            let head: String = body.lines().take(5).join(" | ");
            OrbprepError::EphemerisResponse(format!("no $$SOE/$$EOE block in answer: {head}"))
        })?;

    // every row ends with a comma, which would read as an empty ninth column
    let csv_data = data
        .as_str()
        .lines()
        .map(|line| line.trim().trim_end_matches(','))
        .filter(|line| !line.is_empty())
        .join("\n");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(csv_data.as_bytes());

    reader
        .deserialize::<VectorRow>()
        .map(|row| row.map_err(|e| OrbprepError::EphemerisResponse(e.to_string())))
        .collect()
}
