//! Reference frames and the fixed ecliptic ↔ equatorial geometry.
//!
//! A [`Frame`] is the pair of an [`Origin`] (heliocentric or barycentric) and a
//! [`Plane`] (mean ecliptic or mean equator of J2000). Rotations between the two
//! planes are pure rotations about the common x axis (the J2000 equinox), so they
//! apply unchanged to heliocentric and barycentric vectors alike: a translation
//! of the origin by a vector `o` commutes with the rotation once `o` is itself
//! rotated, which is what [`crate::frame_transform`] does by always expressing
//! the solar offset in the equatorial plane.
use std::fmt;

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, RADSEC, T2000};

/// Origin of a Cartesian frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Heliocentric,
    Barycentric,
}

/// Fundamental plane of a Cartesian frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Mean ecliptic and equinox of J2000
    Ecliptic,
    /// Mean equator and equinox of J2000 (ICRF-aligned)
    Equatorial,
}

/// Frame tag carried by every [`CartesianState`](crate::cartesian_state::CartesianState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    pub origin: Origin,
    pub plane: Plane,
}

impl Frame {
    pub const HELIO_ECLIPTIC: Frame = Frame::new(Origin::Heliocentric, Plane::Ecliptic);
    pub const HELIO_EQUATORIAL: Frame = Frame::new(Origin::Heliocentric, Plane::Equatorial);
    pub const BARY_ECLIPTIC: Frame = Frame::new(Origin::Barycentric, Plane::Ecliptic);
    pub const BARY_EQUATORIAL: Frame = Frame::new(Origin::Barycentric, Plane::Equatorial);

    pub const fn new(origin: Origin, plane: Plane) -> Self {
        Frame { origin, plane }
    }

    /// Same origin, other plane.
    pub fn with_plane(self, plane: Plane) -> Self {
        Frame { plane, ..self }
    }

    /// Same plane, other origin.
    pub fn with_origin(self, origin: Origin) -> Self {
        Frame { origin, ..self }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Heliocentric => write!(f, "heliocentric"),
            Origin::Barycentric => write!(f, "barycentric"),
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plane::Ecliptic => write!(f, "ecliptic"),
            Plane::Equatorial => write!(f, "equatorial"),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.plane)
    }
}

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// ```text
/// ε(t) = ε₀ + ε₁·T + ε₂·T² + ε₃·T³,   T = (tjm - T2000) / 36525
/// ```
/// evaluated with Horner's method, coefficients in arcseconds.
pub fn obleq(tjm: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes.
///
/// The rotation is **active** (the vector is rotated in a fixed frame) by `alpha`
/// radians around axis `k` (`0` → X, `1` → Y, `2` → Z).
///
/// # Panics
///
/// Panics if `k > 2`.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation taking ecliptic J2000 components to equatorial J2000 components.
///
/// The angle is the J2000 mean obliquity, with no precession term: the
/// transform is the same for every epoch.
pub fn ecliptic_to_equatorial() -> Matrix3<f64> {
    rotmt(obleq(T2000), 0)
}

/// Rotation taking equatorial J2000 components to ecliptic J2000 components.
pub fn equatorial_to_ecliptic() -> Matrix3<f64> {
    ecliptic_to_equatorial().transpose()
}
