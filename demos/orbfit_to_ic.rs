use std::env;

use camino::Utf8PathBuf;
use orbprep::{
    ephemeris::horizons::HorizonsEphemeris,
    initial_conditions::InitialConditionsWriter,
    orbfit::parser::Dialect,
    orbprep_errors::OrbprepError,
    pipeline::{process_object, ObjectJob},
    ref_system::Frame,
};

/// Convert one OrbFit element file into n-body initial conditions.
///
/// Usage
/// -----------------
/// `cargo run --example orbfit_to_ic -- <element file> [file type] [output]`
///
/// * file type: `eq` (default), `fel` or `ele220`.
/// * output: `holman_ic` in the current directory by default.
///
/// The solar state is fetched from JPL Horizons, so network access is needed.
fn main() -> Result<(), OrbprepError> {
    pretty_env_logger::init();

    let mut args = env::args().skip(1);
    let input: Utf8PathBuf = args
        .next()
        .ok_or(OrbprepError::MissingArgument("element file"))?
        .into();
    let dialect: Dialect = args.next().as_deref().unwrap_or("eq").parse()?;
    let output: Utf8PathBuf = args.next().unwrap_or_else(|| "holman_ic".into()).into();

    let job = ObjectJob::new(input, dialect, output);
    let set = process_object(&job, &HorizonsEphemeris::default(), &InitialConditionsWriter::default())?;

    for state in set.states() {
        println!("{:<24} {:?}", state.frame().to_string(), state.to_array());
    }
    if let Some(cov) = set.covariance_in(Frame::BARY_EQUATORIAL) {
        println!("covariance (barycentric-equatorial):\n{}", cov.as_matrix());
    }
    println!("written: {}", job.output);
    Ok(())
}
