//! # Frame-tagged Cartesian states
//!
//! [`CartesianState`] is the value passed between the parser, the frame
//! transforms and the writer. It always carries:
//!
//! * a position in **AU** and a velocity in **AU/day**,
//! * a [`Frame`] tag (origin × plane),
//! * an epoch as a [`hifitime::Epoch`], which keeps its own time scale.
//!
//! States are never re-tagged in place: transforms build new values through
//! [`CartesianState::new`] and the owning [`ElementSet`](crate::element_set::ElementSet)
//! keeps every frame it went through.
//!
//! Components are addressed through the closed [`Component`] enumeration
//! rather than by name.
use std::ops::Index;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::ref_system::Frame;

/// One of the six Cartesian state components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    X,
    Y,
    Z,
    Vx,
    Vy,
    Vz,
}

impl Component {
    /// All components, in state-vector order.
    pub const ALL: [Component; 6] = [
        Component::X,
        Component::Y,
        Component::Z,
        Component::Vx,
        Component::Vy,
        Component::Vz,
    ];

    /// Position of the component in the flattened 6-vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_position(self) -> bool {
        self.index() < 3
    }
}

/// Cartesian position/velocity of a body in a tagged frame at a given epoch.
///
/// Fields
/// -----------------
/// * `position` – AU.
/// * `velocity` – AU/day.
/// * `frame` – origin and plane of both vectors.
/// * `epoch` – epoch of the state, with its time scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianState {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    frame: Frame,
    epoch: Epoch,
}

/// Absolute differences between two states and whether each one is within threshold.
///
/// Returned by [`CartesianState::compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct StateComparison {
    /// |a - b| per component (AU, AU/day)
    pub errors: [f64; 6],
    /// `errors[i]` below the position (i < 3) or velocity (i ≥ 3) threshold
    pub within: [bool; 6],
}

impl StateComparison {
    pub fn all_within(&self) -> bool {
        self.within.iter().all(|ok| *ok)
    }
}

impl CartesianState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, frame: Frame, epoch: Epoch) -> Self {
        CartesianState {
            position,
            velocity,
            frame,
            epoch,
        }
    }

    /// Build a state from a flattened `[x, y, z, dx, dy, dz]` array.
    pub fn from_array(values: [f64; 6], frame: Frame, epoch: Epoch) -> Self {
        CartesianState::new(
            Vector3::new(values[0], values[1], values[2]),
            Vector3::new(values[3], values[4], values[5]),
            frame,
            epoch,
        )
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn velocity(&self) -> &Vector3<f64> {
        &self.velocity
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Flattened `[x, y, z, dx, dy, dz]`, the layout expected by the integrator.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ]
    }

    /// Compare two states component by component.
    ///
    /// Frames and epochs are not checked: this is a numerical comparison, used
    /// to validate transforms against an independent ephemeris.
    ///
    /// Arguments
    /// -----------------
    /// * `other` – the reference state.
    /// * `threshold_xyz` – maximum absolute position error (AU).
    /// * `threshold_v` – maximum absolute velocity error (AU/day).
    ///
    /// Return
    /// ----------
    /// * A [`StateComparison`] holding the absolute errors and the per-component verdicts.
    pub fn compare(
        &self,
        other: &CartesianState,
        threshold_xyz: f64,
        threshold_v: f64,
    ) -> StateComparison {
        let a = self.to_array();
        let b = other.to_array();
        let mut errors = [0.0; 6];
        let mut within = [false; 6];
        for c in Component::ALL {
            let i = c.index();
            errors[i] = (a[i] - b[i]).abs();
            let threshold = if c.is_position() {
                threshold_xyz
            } else {
                threshold_v
            };
            within[i] = errors[i] < threshold;
        }
        StateComparison { errors, within }
    }
}

impl Index<Component> for CartesianState {
    type Output = f64;

    fn index(&self, component: Component) -> &f64 {
        match component {
            Component::X => &self.position.x,
            Component::Y => &self.position.y,
            Component::Z => &self.position.z,
            Component::Vx => &self.velocity.x,
            Component::Vy => &self.velocity.y,
            Component::Vz => &self.velocity.z,
        }
    }
}
