//! Symmetric 6×6 state covariance.
//!
//! OrbFit stores the covariance of `(x, y, z, dx, dy, dz)` as the 21 entries of
//! its upper triangle, row by row:
//!
//! ```text
//! c11 c12 c13 c14 c15 c16 c22 c23 c24 c25 c26 c33 c34 c35 c36 c44 c45 c46 c55 c56 c66
//! ```
//!
//! [`CovarianceMatrix`] rebuilds the full symmetric matrix from that encoding.
//! A covariance is either complete or missing altogether, which [`Covariance`]
//! makes explicit: there is no way to hold a partially filled matrix.
use nalgebra::{Matrix3, Matrix6};

use crate::{cartesian_state::Component, constants::COV_ENTRIES};

#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    matrix: Matrix6<f64>,
}

impl CovarianceMatrix {
    /// Rebuild the symmetric matrix from its row-major upper triangle.
    pub fn from_upper_triangle(values: &[f64; COV_ENTRIES]) -> Self {
        let mut matrix = Matrix6::zeros();
        let mut k = 0;
        for i in 0..6 {
            for j in i..6 {
                matrix[(i, j)] = values[k];
                matrix[(j, i)] = values[k];
                k += 1;
            }
        }
        CovarianceMatrix { matrix }
    }

    /// Row-major upper triangle, the inverse of [`Self::from_upper_triangle`].
    pub fn upper_triangle(&self) -> [f64; COV_ENTRIES] {
        let mut values = [0.0; COV_ENTRIES];
        let mut k = 0;
        for i in 0..6 {
            for j in i..6 {
                values[k] = self.matrix[(i, j)];
                k += 1;
            }
        }
        values
    }

    /// Entry `c_ij`; symmetric in its arguments.
    pub fn get(&self, row: Component, col: Component) -> f64 {
        self.matrix[(row.index(), col.index())]
    }

    pub fn as_matrix(&self) -> &Matrix6<f64> {
        &self.matrix
    }

    /// Express the covariance in a rotated frame.
    ///
    /// `rot` is the 3×3 rotation applied to both position and velocity; the
    /// covariance transforms as `J · C · Jᵀ` with `J = diag(rot, rot)`. A shift of
    /// origin by a deterministic vector leaves the covariance unchanged.
    pub fn rotated(&self, rot: &Matrix3<f64>) -> Self {
        let mut jac = Matrix6::zeros();
        jac.fixed_view_mut::<3, 3>(0, 0).copy_from(rot);
        jac.fixed_view_mut::<3, 3>(3, 3).copy_from(rot);
        let matrix = jac * self.matrix * jac.transpose();
        // remove the rounding asymmetry introduced by the product
        let matrix = (matrix + matrix.transpose()) * 0.5;
        CovarianceMatrix { matrix }
    }
}

/// Covariance attached to an element set: complete or explicitly absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Covariance {
    Present(CovarianceMatrix),
    #[default]
    Absent,
}

impl Covariance {
    pub fn is_present(&self) -> bool {
        matches!(self, Covariance::Present(_))
    }

    pub fn as_matrix(&self) -> Option<&CovarianceMatrix> {
        match self {
            Covariance::Present(cov) => Some(cov),
            Covariance::Absent => None,
        }
    }
}
