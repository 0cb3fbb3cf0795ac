//! Direction type for representing grid and domain orientation.
//!
//! Direction matrices represent the orientation of grid axes in physical
//! space. Column i is the physical direction of the i-th grid axis.

use super::Vector;
use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};

/// Direction matrix representing grid orientation.
///
/// The direction matrix is a D×D orthonormal matrix where each column
/// represents the direction of the corresponding grid axis in physical
/// space.
///
/// This is a thin wrapper around nalgebra's SMatrix to provide
/// domain-specific functionality while maintaining all nalgebra operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Check if the direction matrix is orthogonal (rotation matrix).
    pub fn is_orthogonal(&self) -> bool {
        let product = self.0 * self.0.transpose();
        let identity = Self::identity();
        (0..D).all(|i| (0..D).all(|j| (product[(i, j)] - identity.0[(i, j)]).abs() < 1e-6))
    }

    /// Transpose of the direction matrix.
    ///
    /// For an orthonormal direction this is its inverse.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Apply the direction matrix to a vector.
    pub fn apply(&self, vector: &Vector<D>) -> Vector<D> {
        Vector(self.0 * vector.0)
    }

    /// Flatten the matrix in row-major order.
    pub fn to_row_major(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(D * D);
        for row in 0..D {
            for col in 0..D {
                values.push(self.0[(row, col)]);
            }
        }
        values
    }

    /// Rebuild a direction matrix from a row-major slice of D*D entries.
    pub fn from_row_major(values: &[f64]) -> Self {
        assert!(
            values.len() == D * D,
            "Row-major slice length must be D * D"
        );
        let mut matrix = SMatrix::zeros();
        for row in 0..D {
            for col in 0..D {
                matrix[(row, col)] = values[row * D + col];
            }
        }
        Self(matrix)
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }
}
