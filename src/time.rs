use hifitime::{Epoch, TimeScale};

use crate::constants::{JD, MJD};

/// Number of decimals kept on a julian date written as `tstart`.
///
/// The TDB conversions of hifitime are not exactly invertible and leave about
/// 1e-8 day of noise on a round trip; 1e-7 day (8.64 ms) absorbs it.
pub const TSTART_DECIMALS: i32 = 7;

/// Map the time-scale token written by OrbFit after an epoch value.
///
/// OrbFit writes `TDT` (the historical name of TT); `TT`, `TDB`, `UTC` and `TAI`
/// are also accepted, case-insensitively.
///
/// Argument
/// --------
/// * `token`: the time scale label, e.g. `"TDT"`
///
/// Return
/// ------
/// * the matching [`TimeScale`], or `None` for an unknown label
pub fn parse_time_scale(token: &str) -> Option<TimeScale> {
    match token.trim().to_ascii_uppercase().as_str() {
        "TDT" | "TT" => Some(TimeScale::TT),
        "TDB" => Some(TimeScale::TDB),
        "UTC" => Some(TimeScale::UTC),
        "TAI" => Some(TimeScale::TAI),
        _ => None,
    }
}

/// Build an epoch from a modified julian date expressed in the given time scale.
///
/// The returned epoch is tagged with `time_scale`.
pub fn epoch_from_mjd(mjd: MJD, time_scale: TimeScale) -> Epoch {
    // from_mjd_in_time_scale mishandles TDB, use the dedicated constructors
    let epoch = match time_scale {
        TimeScale::TDB => Epoch::from_mjd_tdb(mjd),
        TimeScale::UTC => Epoch::from_mjd_utc(mjd),
        TimeScale::TAI => Epoch::from_mjd_tai(mjd),
        other => Epoch::from_mjd_in_time_scale(mjd, other),
    };
    epoch.to_time_scale(time_scale)
}

/// Build a TDB-tagged epoch from a julian date in TDB.
pub fn epoch_from_jd_tdb(jd: JD) -> Epoch {
    Epoch::from_jde_tdb(jd).to_time_scale(TimeScale::TDB)
}

/// Julian date of an epoch in the TDB time scale, the scale of `tstart` in the
/// integrator input.
pub fn jd_tdb(epoch: &Epoch) -> JD {
    epoch.to_jde_tdb_days()
}

/// [`jd_tdb`] rounded to [`TSTART_DECIMALS`] decimals.
pub fn tstart_jd(epoch: &Epoch) -> JD {
    let scale = 10f64.powi(TSTART_DECIMALS);
    (jd_tdb(epoch) * scale).round() / scale
}
