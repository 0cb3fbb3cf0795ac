//! Transform trait for spatial coordinate transformations.
//!
//! This module defines the core Transform trait that all spatial transforms
//! implement.

use crate::error::{Result, TransformError};
use crate::spatial::{Point, Vector};

/// Transform trait for spatial coordinate transformations.
///
/// Maps points from one physical space to another. Vector and covariant
/// vector transforms default to an unsupported-operation error; only
/// transforms that can carry directions through a single fixed Jacobian
/// (see [`Transform::is_linear`]) override them.
///
/// # Type Parameters
/// * `D` - The spatial dimensionality (2 or 3)
pub trait Transform<const D: usize> {
    /// Apply the transform to a point.
    fn transform_point(&self, point: &Point<D>) -> Result<Point<D>>;

    /// Whether the transform is linear: `T(a*P + b*Q) = a*T(P) + b*T(Q)`.
    ///
    /// Capability query for vector/covariant-vector transforms: only linear
    /// transforms can carry directions independently of position.
    fn is_linear(&self) -> bool {
        false
    }

    /// Apply the transform to a vector.
    fn transform_vector(&self, _vector: &Vector<D>) -> Result<Vector<D>> {
        Err(TransformError::unsupported_operation(
            "transform_vector is only applicable to linear transforms",
        ))
    }

    /// Apply the transform to a covariant vector.
    fn transform_covariant_vector(&self, _vector: &Vector<D>) -> Result<Vector<D>> {
        Err(TransformError::unsupported_operation(
            "transform_covariant_vector is only applicable to linear transforms",
        ))
    }
}
