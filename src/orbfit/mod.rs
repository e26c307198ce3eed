//! # OrbFit element files
//!
//! Readers for the `.fel`/`.eq` files written by OrbFit (format `OEF2.0`).
//! Only the Cartesian block is used:
//!
//! ```text
//! ! Cartesian position and velocity vectors
//!  CAR  -9.885802285735769E-01 -1.388919024773300E-01  1.075940347782014E-05 ...
//!  MJD     58936.999199216 TDT
//!  COV   4.104406585014604E-16 -1.077734254013233E-16  5.104446813236040E-17
//!  ...
//! ```
//!
//! * [`record_reader`] – locate the last occurrence of a block marker.
//! * [`covariance_decoder`] – rebuild the 6×6 covariance from the ` COV` rows.
//! * [`parser`] – assemble an [`ElementSet`](crate::element_set::ElementSet).
//!
//! Values are heliocentric, mean ecliptic J2000, in AU and AU/day.
use hifitime::Epoch;
use nom::{
    bytes::complete::take_till1,
    character::complete::multispace0,
    combinator::map_res,
    multi::many0,
    sequence::preceded,
    IResult, Parser,
};

use crate::time::{epoch_from_mjd, parse_time_scale};

pub mod covariance_decoder;
pub mod parser;
pub mod record_reader;

fn token(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_till1(|c: char| c.is_whitespace())).parse(input)
}

/// Float token, Fortran `D` exponents included (`1.0D-08`).
fn fortran_float(input: &str) -> IResult<&str, f64> {
    map_res(token, |tok: &str| tok.replace(['D', 'd'], "E").parse::<f64>()).parse(input)
}

/// Split a row into its label and the numeric values following it.
///
/// Every token after the label must be numeric.
pub(crate) fn labelled_values(line: &str) -> Result<(&str, Vec<f64>), String> {
    let (rest, (label, values)) = (token, many0(fortran_float))
        .parse(line)
        .map_err(|e| format!("unable to read '{}': {e}", line.trim()))?;

    let rest = rest.trim();
    if !rest.is_empty() {
        return Err(format!("non-numeric token in '{}': '{rest}'", line.trim()));
    }
    Ok((label, values))
}

/// Read an epoch row such as ` MJD     58936.999199216 TDT`.
pub(crate) fn mjd_epoch(line: &str) -> Result<Epoch, String> {
    let (rest, (_, mjd, scale)) = (token, fortran_float, token)
        .parse(line)
        .map_err(|e| format!("unable to read epoch '{}': {e}", line.trim()))?;

    if !rest.trim().is_empty() {
        return Err(format!("trailing data in epoch '{}'", line.trim()));
    }
    let time_scale =
        parse_time_scale(scale).ok_or_else(|| format!("unknown time scale '{scale}'"))?;
    Ok(epoch_from_mjd(mjd, time_scale))
}
