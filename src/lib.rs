//! Preparation of n-body initial conditions from OrbFit orbital elements.
//!
//! See [`pipeline::process_object`] for the whole chain and the individual
//! modules for each step.
pub mod cartesian_state;
pub mod config;
pub mod constants;
pub mod covariance;
pub mod element_set;
pub mod ephemeris;
pub mod frame_transform;
pub mod initial_conditions;
pub mod orbfit;
pub mod orbprep_errors;
pub mod pipeline;
pub mod ref_system;
pub mod time;

#[cfg(test)]
pub(crate) mod unit_test_global {
    use std::sync::LazyLock;

    use hifitime::Epoch;
    use nalgebra::Vector3;

    use crate::{
        ephemeris::{recorded::RecordedEphemeris, SolarState},
        time::jd_tdb,
    };

    /// 2020-Mar-29 00:00 UTC, i.e. JD 2458937.500800741 TDB.
    pub(crate) static REFERENCE_EPOCH: LazyLock<Epoch> =
        LazyLock::new(|| Epoch::from_jde_utc(2458937.5));

    /// Barycentric state of the Sun at [`REFERENCE_EPOCH`] (km, km/day), as
    /// returned by JPL Horizons.
    pub(crate) static RECORDED_SUN: LazyLock<RecordedEphemeris> = LazyLock::new(|| {
        RecordedEphemeris::new(1e-6).with_record(
            jd_tdb(&REFERENCE_EPOCH),
            SolarState {
                position: Vector3::new(-676381.5546569857, 989688.4902207577, 436105.2280259226),
                velocity: Vector3::new(
                    -1227.6749258995383,
                    -401.39632988520543,
                    -136.46582534826337,
                ),
            },
        )
    });
}
