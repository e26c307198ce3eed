//! # Solar ephemeris
//!
//! The barycentric translation needs one thing from the outside world: the
//! state of the Sun relative to the solar system barycenter, in the equatorial
//! (ICRF) plane, at a TDB epoch. [`SolarEphemeris`] is that contract.
//!
//! Implementations
//! -----------------
//! * [`horizons::HorizonsEphemeris`] – live query of the JPL Horizons API.
//! * [`recorded::RecordedEphemeris`] – in-memory table of solar states, for
//!   tests and offline replay of earlier queries.
//!
//! Units
//! -----------------
//! * `position`: kilometers (km)
//! * `velocity`: kilometers per day (km/day)
//!
//! Use [`SolarState::to_au`] to convert to AU, AU/day.
use std::ops::Div;

use hifitime::{Epoch, TimeScale};
use nalgebra::Vector3;

use crate::{constants::AU, orbprep_errors::OrbprepError};

pub mod horizons;
pub mod recorded;

/// Barycentric state of the Sun.
///
/// Fields
/// -----------------
/// * `position` – km, equatorial plane.
/// * `velocity` – km/day, equatorial plane.
#[derive(Debug, PartialEq, Clone)]
pub struct SolarState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl SolarState {
    /// Convert to AU and AU/day.
    #[must_use = "`.to_au()` returns a new SolarState; assign or use it"]
    pub fn to_au(&self) -> Self {
        self / AU
    }
}

impl Div<f64> for &SolarState {
    type Output = SolarState;

    fn div(self, rhs: f64) -> Self::Output {
        SolarState {
            position: self.position / rhs,
            velocity: self.velocity / rhs,
        }
    }
}

/// Provider of the barycentric state of the Sun.
///
/// Implementations must be `Sync` to be shared by the batch pipeline.
pub trait SolarEphemeris {
    /// Convert an epoch to the TDB time scale expected by [`Self::solar_state_at`].
    ///
    /// The default relies on hifitime's time scale conversions (leap seconds
    /// included for UTC).
    fn to_tdb(&self, epoch: Epoch) -> Epoch {
        epoch.to_time_scale(TimeScale::TDB)
    }

    /// Barycentric state of the Sun at `epoch_tdb`, in km and km/day.
    ///
    /// Errors
    /// ----------
    /// * [`OrbprepError::EphemerisUnavailable`] – the service could not be reached.
    /// * [`OrbprepError::EphemerisResponse`] – the answer could not be read.
    /// * [`OrbprepError::EpochNotRecorded`] – no data for this epoch.
    fn solar_state_at(&self, epoch_tdb: Epoch) -> Result<SolarState, OrbprepError>;
}
