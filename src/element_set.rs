//! # Element sets
//!
//! An [`ElementSet`] gathers everything known about one body during a
//! parse → transform → write session:
//!
//! * the object designation and the file it was read from,
//! * every [`CartesianState`] the body went through, in order (the parsed
//!   heliocentric-ecliptic state first, then one state per transform),
//! * zero or one [`Covariance`], expressed in the plane of the parsed state.
//!
//! Transforms never drop earlier frames, so intermediate states stay available
//! for diagnostics. [`ElementSet::to_equatorial`] and
//! [`ElementSet::to_barycentric`] chain the two steps of the usual pipeline.
use camino::{Utf8Path, Utf8PathBuf};

use crate::{
    cartesian_state::CartesianState,
    constants::ObjectNumber,
    covariance::{Covariance, CovarianceMatrix},
    ephemeris::SolarEphemeris,
    frame_transform::{rotate_ecliptic_equatorial, translate_helio_bary, Direction},
    orbprep_errors::OrbprepError,
    ref_system::{ecliptic_to_equatorial, equatorial_to_ecliptic, Frame, Plane},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet {
    object: ObjectNumber,
    source: Option<Utf8PathBuf>,
    states: Vec<CartesianState>,
    covariance: Covariance,
}

impl ElementSet {
    /// Empty set, as left by a file without Cartesian elements.
    pub fn new(object: ObjectNumber) -> Self {
        ElementSet {
            object,
            source: None,
            states: Vec::new(),
            covariance: Covariance::Absent,
        }
    }

    /// Set populated by a parse: one state and its covariance.
    pub fn from_parse(object: ObjectNumber, state: CartesianState, covariance: Covariance) -> Self {
        ElementSet {
            object,
            source: None,
            states: vec![state],
            covariance,
        }
    }

    pub fn with_source(mut self, source: &Utf8Path) -> Self {
        self.source = Some(source.to_path_buf());
        self
    }

    pub fn object(&self) -> &ObjectNumber {
        &self.object
    }

    pub fn source(&self) -> Option<&Utf8Path> {
        self.source.as_deref()
    }

    /// All states, in the order they were added.
    pub fn states(&self) -> &[CartesianState] {
        &self.states
    }

    pub fn covariance(&self) -> &Covariance {
        &self.covariance
    }

    /// Most recently added state.
    pub fn latest(&self) -> Option<&CartesianState> {
        self.states.last()
    }

    /// Most recent state tagged with `frame`.
    pub fn state(&self, frame: Frame) -> Option<&CartesianState> {
        self.states.iter().rev().find(|s| s.frame() == frame)
    }

    /// Like [`Self::state`], failing with [`OrbprepError::MissingFrame`].
    pub fn require(&self, frame: Frame) -> Result<&CartesianState, OrbprepError> {
        self.state(frame).ok_or(OrbprepError::MissingFrame(frame))
    }

    /// Append a new state; earlier states are kept.
    pub fn push_state(&mut self, state: CartesianState) {
        self.states.push(state);
    }

    /// Covariance expressed in the plane of `frame`.
    ///
    /// The stored covariance belongs to the first (parsed) state. Changing the
    /// origin does not alter it; changing the plane rotates it.
    ///
    /// Return
    /// ----------
    /// * `None` when the covariance is absent or the set has no state.
    pub fn covariance_in(&self, frame: Frame) -> Option<CovarianceMatrix> {
        let cov = self.covariance.as_matrix()?;
        let parsed_plane = self.states.first()?.frame().plane;
        match (parsed_plane, frame.plane) {
            (Plane::Ecliptic, Plane::Equatorial) => Some(cov.rotated(&ecliptic_to_equatorial())),
            (Plane::Equatorial, Plane::Ecliptic) => Some(cov.rotated(&equatorial_to_ecliptic())),
            _ => Some(cov.clone()),
        }
    }

    /// Rotate the heliocentric-ecliptic state to the equatorial plane and append it.
    ///
    /// Errors
    /// ----------
    /// * [`OrbprepError::MissingFrame`] – no heliocentric-ecliptic state.
    pub fn to_equatorial(&mut self) -> Result<&CartesianState, OrbprepError> {
        let ecliptic = self.require(Frame::HELIO_ECLIPTIC)?;
        let equatorial = rotate_ecliptic_equatorial(ecliptic, Direction::Forward)?;
        self.push_state(equatorial);
        self.require(Frame::HELIO_EQUATORIAL)
    }

    /// Shift the heliocentric-equatorial state to the barycenter and append it.
    ///
    /// Errors
    /// ----------
    /// * [`OrbprepError::MissingFrame`] – no heliocentric-equatorial state.
    /// * any ephemeris error from `ephemeris`.
    pub fn to_barycentric<E>(&mut self, ephemeris: &E) -> Result<&CartesianState, OrbprepError>
    where
        E: SolarEphemeris + ?Sized,
    {
        let helio = self.require(Frame::HELIO_EQUATORIAL)?;
        let bary = translate_helio_bary(helio, ephemeris, Direction::Forward)?;
        self.push_state(bary);
        self.require(Frame::BARY_EQUATORIAL)
    }
}
