//! Transform types and operations.
//!
//! This module provides the transform trait and the B-spline deformable
//! transform together with its domain and weights-function collaborators.

pub mod bspline;
pub mod domain;
pub mod trait_;
pub mod weights;

pub use bspline::{BSplineTransform, PointTransformOutput, SparseJacobian};
pub use domain::TransformDomain;
pub use trait_::Transform;
pub use weights::{BSplineWeightsFunction, SupportWeights};
