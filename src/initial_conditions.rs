//! # Integrator initial conditions
//!
//! Hand-off to the n-body integrator, in two forms:
//!
//! * [`IntegratorInput`] – the in-memory arguments of the integration call
//!   (`tstart`, `tstep`, `trange`, `geocentric`, particle count and the
//!   concatenated barycentric-equatorial states);
//! * the `holman_ic` text file written by [`InitialConditionsWriter`]:
//!
//! ```text
//! tstart 2458849.5
//! tstep +20.0
//! trange 600.
//! geocentric 0
//! state
//! 3.000000e+00 2.000000e+00 1.000000e+00
//! 3.000000e-01 2.000000e-01 1.000000e-01
//! ```
//!
//! `tstart` is the epoch of the states as a TDB julian date, rounded to
//! [`TSTART_DECIMALS`](crate::time::TSTART_DECIMALS) decimals. Only
//! barycentric-equatorial states are accepted.
use std::fmt::Write as _;

use camino::Utf8Path;
use log::info;

use crate::{
    config::IntegrationConfig,
    constants::JD,
    element_set::ElementSet,
    orbprep_errors::OrbprepError,
    ref_system::Frame,
    time::tstart_jd,
};

/// Arguments of one integrator call.
///
/// Fields
/// -----------------
/// * `tstart` – common epoch of the particles (JD TDB, see [`tstart_jd`]).
/// * `tstep`, `trange` – step and span of the integration (days).
/// * `geocentric` – integrate around the Earth instead of the barycenter.
/// * `n_particles` – number of particles.
/// * `states` – `6 * n_particles` values, `[x, y, z, dx, dy, dz]` per particle,
///   barycentric-equatorial, AU and AU/day.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorInput {
    pub tstart: JD,
    pub tstep: f64,
    pub trange: f64,
    pub geocentric: bool,
    pub n_particles: usize,
    pub states: Vec<f64>,
}

impl IntegratorInput {
    /// Gather the barycentric-equatorial states of several element sets.
    ///
    /// Errors
    /// ----------
    /// * [`OrbprepError::MissingArgument`] – no element set given.
    /// * [`OrbprepError::MissingFrame`] – a set has no barycentric-equatorial state.
    /// * [`OrbprepError::EpochMismatch`] – the states are not all at the same epoch.
    pub fn from_element_sets(
        sets: &[ElementSet],
        config: &IntegrationConfig,
    ) -> Result<Self, OrbprepError> {
        let mut tstart = None;
        let mut states = Vec::with_capacity(6 * sets.len());

        for set in sets {
            let state = set.require(Frame::BARY_EQUATORIAL)?;
            let jd = tstart_jd(&state.epoch());
            match tstart {
                None => tstart = Some(jd),
                Some(first) if first != jd => {
                    return Err(OrbprepError::EpochMismatch { first, other: jd });
                }
                Some(_) => {}
            }
            states.extend_from_slice(&state.to_array());
        }

        let tstart = tstart.ok_or(OrbprepError::MissingArgument("element sets"))?;
        Ok(IntegratorInput {
            tstart,
            tstep: config.tstep,
            trange: config.trange,
            geocentric: config.geocentric,
            n_particles: sets.len(),
            states,
        })
    }

    /// Text of the initial-conditions file.
    pub fn to_ic_text(&self) -> String {
        let mut text = String::new();
        // writing into a String cannot fail
        let _ = writeln!(text, "tstart {}", self.tstart);
        let _ = writeln!(text, "tstep {:+.1}", self.tstep);
        let _ = writeln!(text, "trange {}", format_trange(self.trange));
        let _ = writeln!(text, "geocentric {}", u8::from(self.geocentric));
        text.push_str("state\n");
        for triple in self.states.chunks(3) {
            let line: Vec<String> = triple.iter().map(|v| format_sci(*v)).collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }
        text
    }
}

/// `%e` style: six decimals, signed exponent of at least two digits.
fn format_sci(value: f64) -> String {
    let raw = format!("{value:.6e}");
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        // NaN, inf
        None => raw,
    }
}

/// Whole spans are written with a trailing dot (`600.`).
fn format_trange(trange: f64) -> String {
    if trange.is_finite() && trange.fract() == 0.0 {
        format!("{trange:.0}.")
    } else {
        format!("{trange}")
    }
}

/// Writer of the `holman_ic` initial-conditions file.
#[derive(Debug, Clone, Default)]
pub struct InitialConditionsWriter {
    config: IntegrationConfig,
}

impl InitialConditionsWriter {
    pub fn new(config: IntegrationConfig) -> Self {
        InitialConditionsWriter { config }
    }

    /// Render the initial conditions of one element set.
    ///
    /// Errors
    /// ----------
    /// * [`OrbprepError::MissingFrame`] – no barycentric-equatorial state.
    pub fn render(&self, set: &ElementSet) -> Result<String, OrbprepError> {
        IntegratorInput::from_element_sets(std::slice::from_ref(set), &self.config)
            .map(|input| input.to_ic_text())
    }

    /// Write the initial conditions of one element set, replacing `output`.
    ///
    /// Arguments
    /// -----------------
    /// * `set` – an element set holding a barycentric-equatorial state.
    /// * `output` – destination file.
    ///
    /// Errors
    /// ----------
    /// * [`OrbprepError::MissingFrame`] – nothing to write; `output` is left untouched.
    /// * [`OrbprepError::IoError`] – the file cannot be written.
    pub fn write(&self, set: &ElementSet, output: &Utf8Path) -> Result<(), OrbprepError> {
        let text = self.render(set)?;
        std::fs::write(output, text)?;
        info!("Initial conditions of {} written to {output}", set.object());
        Ok(())
    }
}
