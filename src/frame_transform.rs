//! # Frame transforms
//!
//! The two steps taking an OrbFit state to the integrator frame:
//!
//! 1. [`rotate_ecliptic_equatorial`] – fixed rotation about the J2000 equinox
//!    by the mean obliquity ε = 84381.448″ (see [`crate::ref_system::obleq`]).
//! 2. [`translate_helio_bary`] – shift of the origin by the barycentric state
//!    of the Sun, supplied by a [`SolarEphemeris`].
//!
//! Both functions are pure: they check the [`Frame`] tag of the input, build a
//! new [`CartesianState`] and leave the input untouched. Each one has a
//! [`Direction::Backward`] form that undoes it.
//!
//! The rotation carries no precession term, so the equatorial frame is the mean
//! equator of J2000 whatever the epoch of the state.
use crate::{
    cartesian_state::CartesianState,
    ephemeris::SolarEphemeris,
    orbprep_errors::OrbprepError,
    ref_system::{ecliptic_to_equatorial, equatorial_to_ecliptic, Origin, Plane},
};

/// Direction of a frame transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// ecliptic → equatorial, heliocentric → barycentric
    Forward,
    /// equatorial → ecliptic, barycentric → heliocentric
    Backward,
}

/// Rotate a state between the ecliptic and equatorial planes.
///
/// Arguments
/// -----------------
/// * `state` – the input state, in the ecliptic plane for [`Direction::Forward`],
///   in the equatorial plane for [`Direction::Backward`].
/// * `direction` – which way to rotate.
///
/// Return
/// ----------
/// * A new state with the same origin and epoch, tagged with the other plane.
///
/// Errors
/// ----------
/// * [`OrbprepError::FrameMismatch`] – the input plane does not match `direction`.
pub fn rotate_ecliptic_equatorial(
    state: &CartesianState,
    direction: Direction,
) -> Result<CartesianState, OrbprepError> {
    let (from, to, rot) = match direction {
        Direction::Forward => (Plane::Ecliptic, Plane::Equatorial, ecliptic_to_equatorial()),
        Direction::Backward => (Plane::Equatorial, Plane::Ecliptic, equatorial_to_ecliptic()),
    };

    let frame = state.frame();
    if frame.plane != from {
        return Err(OrbprepError::FrameMismatch {
            expected: from.to_string(),
            found: frame,
        });
    }

    Ok(CartesianState::new(
        rot * state.position(),
        rot * state.velocity(),
        frame.with_plane(to),
        state.epoch(),
    ))
}

/// Move a state between the heliocentric and barycentric origins.
///
/// The solar offset is queried at the state epoch converted to TDB
/// ([`SolarEphemeris::to_tdb`]), then converted from km, km/day to AU, AU/day.
/// The output keeps the epoch of the input, time scale included.
///
/// Arguments
/// -----------------
/// * `state` – an equatorial state; heliocentric for [`Direction::Forward`],
///   barycentric for [`Direction::Backward`].
/// * `ephemeris` – provider of the barycentric state of the Sun.
/// * `direction` – which way to translate.
///
/// Errors
/// ----------
/// * [`OrbprepError::FrameMismatch`] – the input is not equatorial, or its origin
///   does not match `direction`.
/// * any error raised by `ephemeris`.
pub fn translate_helio_bary<E>(
    state: &CartesianState,
    ephemeris: &E,
    direction: Direction,
) -> Result<CartesianState, OrbprepError>
where
    E: SolarEphemeris + ?Sized,
{
    let (from, to, sign) = match direction {
        Direction::Forward => (Origin::Heliocentric, Origin::Barycentric, 1.0),
        Direction::Backward => (Origin::Barycentric, Origin::Heliocentric, -1.0),
    };

    let frame = state.frame();
    if frame.plane != Plane::Equatorial || frame.origin != from {
        return Err(OrbprepError::FrameMismatch {
            expected: frame.with_origin(from).with_plane(Plane::Equatorial).to_string(),
            found: frame,
        });
    }

    let tdb = ephemeris.to_tdb(state.epoch());
    let sun = ephemeris.solar_state_at(tdb)?.to_au();

    Ok(CartesianState::new(
        state.position() + sign * sun.position,
        state.velocity() + sign * sun.velocity,
        frame.with_origin(to),
        state.epoch(),
    ))
}

#[cfg(test)]
mod frame_transform_test {
    use super::*;
    use crate::{
        ephemeris::recorded::RecordedEphemeris,
        ref_system::Frame,
        unit_test_global::{RECORDED_SUN, REFERENCE_EPOCH},
    };
    use approx::assert_relative_eq;

    fn ecliptic_state() -> CartesianState {
        CartesianState::from_array(
            [
                -9.8858022857E-01,
                -1.3889190248E-01,
                1.0759403E-05,
                2.1180899E-03,
                -1.7105963E-02,
                3.0576E-07,
            ],
            Frame::HELIO_ECLIPTIC,
            *REFERENCE_EPOCH,
        )
    }

    fn assert_state_close(a: &CartesianState, b: &CartesianState, eps_xyz: f64, eps_v: f64) {
        let cmp = a.compare(b, eps_xyz, eps_v);
        assert!(cmp.all_within(), "errors: {:?}", cmp.errors);
    }

    #[test]
    fn test_rotation_forward() {
        let eq = rotate_ecliptic_equatorial(&ecliptic_state(), Direction::Forward).unwrap();
        assert_eq!(eq.frame(), Frame::HELIO_EQUATORIAL);
        assert_eq!(eq.epoch(), *REFERENCE_EPOCH);

        let expected = [
            -0.98858022857,
            -0.12743510893678697,
            -0.05523815439121603,
            0.0021180899,
            -0.015694535831262322,
            -0.006804080782301247,
        ];
        for (got, want) in eq.to_array().iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_rotation_round_trip() {
        let start = ecliptic_state();
        let eq = rotate_ecliptic_equatorial(&start, Direction::Forward).unwrap();
        let back = rotate_ecliptic_equatorial(&eq, Direction::Backward).unwrap();
        assert_eq!(back.frame(), Frame::HELIO_ECLIPTIC);
        assert_state_close(&back, &start, 1e-13, 1e-14);
    }

    #[test]
    fn test_rotation_keeps_origin() {
        let bary = CartesianState::from_array(
            [1.0, 2.0, 3.0, 0.1, 0.2, 0.3],
            Frame::BARY_ECLIPTIC,
            *REFERENCE_EPOCH,
        );
        let eq = rotate_ecliptic_equatorial(&bary, Direction::Forward).unwrap();
        assert_eq!(eq.frame(), Frame::BARY_EQUATORIAL);
        assert_relative_eq!(eq.position().norm(), bary.position().norm(), epsilon = 1e-14);
    }

    #[test]
    fn test_rotation_frame_mismatch() {
        let eq = rotate_ecliptic_equatorial(&ecliptic_state(), Direction::Forward).unwrap();
        let err = rotate_ecliptic_equatorial(&eq, Direction::Forward).unwrap_err();
        assert_eq!(
            err,
            OrbprepError::FrameMismatch {
                expected: "ecliptic".into(),
                found: Frame::HELIO_EQUATORIAL,
            }
        );
    }

    #[test]
    fn test_translation_forward() {
        let ephem = &*RECORDED_SUN;
        let eq = rotate_ecliptic_equatorial(&ecliptic_state(), Direction::Forward).unwrap();
        let bary = translate_helio_bary(&eq, ephem, Direction::Forward).unwrap();

        assert_eq!(bary.frame(), Frame::BARY_EQUATORIAL);
        assert_eq!(bary.epoch(), eq.epoch());

        let expected = [
            -9.9310156E-01,
            -1.2081945E-01,
            -5.2322971E-02,
            2.1098834E-03,
            -1.5697219E-02,
            -6.8049930E-03,
        ];
        for (got, want) in bary.to_array().iter().zip(expected) {
            assert_relative_eq!(*got, want, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_translation_round_trip() {
        let ephem = &*RECORDED_SUN;
        let eq = rotate_ecliptic_equatorial(&ecliptic_state(), Direction::Forward).unwrap();
        let bary = translate_helio_bary(&eq, ephem, Direction::Forward).unwrap();
        let helio = translate_helio_bary(&bary, ephem, Direction::Backward).unwrap();
        assert_eq!(helio.frame(), Frame::HELIO_EQUATORIAL);
        assert_state_close(&helio, &eq, 1e-13, 1e-14);
    }

    #[test]
    fn test_translation_requires_equatorial() {
        let ephem = &*RECORDED_SUN;
        let err = translate_helio_bary(&ecliptic_state(), ephem, Direction::Forward).unwrap_err();
        assert_eq!(
            err,
            OrbprepError::FrameMismatch {
                expected: "heliocentric-equatorial".into(),
                found: Frame::HELIO_ECLIPTIC,
            }
        );
    }

    #[test]
    fn test_translation_backward_requires_barycentric() {
        let ephem = &*RECORDED_SUN;
        let eq = rotate_ecliptic_equatorial(&ecliptic_state(), Direction::Forward).unwrap();
        let err = translate_helio_bary(&eq, ephem, Direction::Backward).unwrap_err();
        assert!(matches!(err, OrbprepError::FrameMismatch { .. }));
    }

    #[test]
    fn test_translation_unknown_epoch() {
        let ephem = RecordedEphemeris::new(1e-6);
        let eq = rotate_ecliptic_equatorial(&ecliptic_state(), Direction::Forward).unwrap();
        let err = translate_helio_bary(&eq, &ephem, Direction::Forward).unwrap_err();
        assert!(matches!(err, OrbprepError::EpochNotRecorded(_)));
    }
}
