//! # Element file → initial conditions pipeline
//!
//! [`process_object`] runs the whole chain for one object:
//!
//! ```text
//! element file ──parse──▶ helio-ecliptic ──rotate──▶ helio-equatorial
//!              ──translate──▶ bary-equatorial ──write──▶ initial conditions
//! ```
//!
//! [`process_batch`] runs many independent jobs on the rayon thread pool. Each
//! job names its own output file; a failing job is logged and reported in the
//! result list without stopping the others.
//!
//! ### Progress UI (feature: `progress`)
//! With the `progress` feature, [`process_batch`] renders an `indicatif`
//! progress bar.
use std::collections::HashSet;

use camino::Utf8PathBuf;
use log::{info, warn};
use rayon::prelude::*;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

use crate::{
    element_set::ElementSet,
    ephemeris::SolarEphemeris,
    initial_conditions::InitialConditionsWriter,
    orbfit::parser::{Dialect, OrbitFileParser},
    orbprep_errors::OrbprepError,
};

/// One object to process: where to read it, how, and where to write it.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectJob {
    pub input: Utf8PathBuf,
    pub dialect: Dialect,
    pub output: Utf8PathBuf,
}

impl ObjectJob {
    pub fn new(input: impl Into<Utf8PathBuf>, dialect: Dialect, output: impl Into<Utf8PathBuf>) -> Self {
        ObjectJob {
            input: input.into(),
            dialect,
            output: output.into(),
        }
    }
}

/// Parse, transform and write one object.
///
/// Arguments
/// -----------------
/// * `job` – input file, dialect and output file.
/// * `ephemeris` – source of the barycentric solar state.
/// * `writer` – initial-conditions writer.
///
/// Return
/// ----------
/// * The element set holding every frame visited, the last one
///   barycentric-equatorial.
///
/// Errors
/// ----------
/// * any parse, transform, ephemeris or write error. A file without Cartesian
///   elements ends with [`OrbprepError::MissingFrame`] and no output is written.
pub fn process_object<E>(
    job: &ObjectJob,
    ephemeris: &E,
    writer: &InitialConditionsWriter,
) -> Result<ElementSet, OrbprepError>
where
    E: SolarEphemeris + ?Sized,
{
    let mut set = OrbitFileParser::new().parse(Some(&job.input), job.dialect)?;
    set.to_equatorial()?;
    set.to_barycentric(ephemeris)?;
    writer.write(&set, &job.output)?;
    Ok(set)
}

/// Process independent jobs in parallel.
///
/// Return
/// ----------
/// * One result per job, in job order.
///
/// Errors
/// ----------
/// * [`OrbprepError::DuplicateOutputPath`] – two jobs share an output file;
///   nothing is processed.
pub fn process_batch<E>(
    jobs: &[ObjectJob],
    ephemeris: &E,
    writer: &InitialConditionsWriter,
) -> Result<Vec<Result<ElementSet, OrbprepError>>, OrbprepError>
where
    E: SolarEphemeris + Sync + ?Sized,
{
    let mut outputs = HashSet::with_capacity(jobs.len());
    for job in jobs {
        if !outputs.insert(job.output.as_path()) {
            return Err(OrbprepError::DuplicateOutputPath(job.output.to_string()));
        }
    }

    #[cfg(feature = "progress")]
    let pb = {
        let pb = ProgressBar::new((jobs.len() as u64).max(1));
        pb.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
            )
            .expect("indicatif template"),
        );
        pb.enable_steady_tick(Duration::from_millis(200));
        pb
    };

    let results: Vec<Result<ElementSet, OrbprepError>> = jobs
        .par_iter()
        .map(|job| {
            let res = process_object(job, ephemeris, writer);
            if let Err(e) = &res {
                warn!("{}: {e}", job.input);
            }
            #[cfg(feature = "progress")]
            pb.inc(1);
            res
        })
        .collect();

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        "Batch done: {} object(s) written, {failed} failed",
        results.len() - failed
    );
    Ok(results)
}
