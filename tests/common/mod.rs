use approx::assert_relative_eq;
use camino::Utf8PathBuf;
use hifitime::{Epoch, TimeScale};
use nalgebra::Vector3;
use orbprep::{
    ephemeris::{recorded::RecordedEphemeris, SolarState},
    time::epoch_from_mjd,
};

/// Epoch of the Cartesian solutions in `tests/data`.
pub fn data_epoch() -> Epoch {
    epoch_from_mjd(58936.999199216, TimeScale::TT)
}

pub fn data_path(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

/// JD TDB of the recorded solar state: 2020-Mar-29 00:00 UTC.
pub const SUN_RECORD_JD_TDB: f64 = 2458937.500800741;

/// Barycentric state of the Sun at [`SUN_RECORD_JD_TDB`], recorded from JPL
/// Horizons.
///
/// `tolerance_days` decides which epochs the record answers for; 0.002 day
/// covers [`data_epoch`], 2.3 minutes earlier.
pub fn recorded_sun(tolerance_days: f64) -> RecordedEphemeris {
    RecordedEphemeris::new(tolerance_days).with_record(
        SUN_RECORD_JD_TDB,
        SolarState {
            position: Vector3::new(-676381.5546569857, 989688.4902207577, 436105.2280259226),
            velocity: Vector3::new(-1227.6749258995383, -401.39632988520543, -136.46582534826337),
        },
    )
}

/// [`recorded_sun`] answering for the epoch of the files in `tests/data`.
pub fn data_sun() -> RecordedEphemeris {
    recorded_sun(0.002)
}

/// Barycentric-equatorial state of 30101 matching [`recorded_sun`].
pub const BARY_EQUATORIAL_30101: [f64; 6] = [
    -9.9310156E-01,
    -1.2081945E-01,
    -5.2322971E-02,
    2.1098834E-03,
    -1.5697219E-02,
    -6.8049930E-03,
];

pub fn assert_state_close(actual: &[f64; 6], expected: &[f64; 6], max_relative: f64) {
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, max_relative = max_relative);
    }
}
