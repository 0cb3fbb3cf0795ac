//! Control-point grid geometry and coefficient rasters.
//!
//! The grid geometry is the derived fixed-parameter set of the transform:
//! it describes where the control points sit in physical space and how a
//! flat coefficient buffer maps onto them.

pub mod coefficients;
pub mod geometry;

pub use coefficients::CoefficientImage;
pub use geometry::GridGeometry;
