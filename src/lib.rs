//! Deformable B-spline point transform over a sparse control-point grid.
//!
//! The deformation field is parameterized by a regular grid of control
//! points, each carrying one displacement coefficient per spatial
//! dimension. A point is transformed by adding the B-spline interpolation
//! of the surrounding control-point displacements; the interpolation has
//! bounded local support, so every point query touches exactly
//! `(order + 1)^D` control points.
//!
//! The main entry point is [`BSplineTransform`]. Typical usage:
//!
//! ```rust
//! use rdeform::{BSplineTransform, TransformDomain, Point, Vector, Direction};
//!
//! let domain = TransformDomain::new(
//!     Point::new([0.0, 0.0]),
//!     Vector::new([100.0, 100.0]),
//!     Direction::identity(),
//!     [4, 4],
//! ).unwrap();
//!
//! let mut transform = BSplineTransform::<2>::new();
//! transform.set_domain(domain);
//!
//! let n = transform.number_of_parameters().unwrap();
//! transform.set_parameters_by_value(&vec![0.0; n]).unwrap();
//!
//! let p = transform.transform_point(&Point::new([50.0, 50.0])).unwrap();
//! assert_eq!(p, Point::new([50.0, 50.0]));
//! ```

pub mod error;
pub mod grid;
pub mod spatial;
pub mod transform;

pub use error::{Result, TransformError};
pub use grid::{CoefficientImage, GridGeometry};
pub use spatial::{Direction, Point, Vector};
pub use transform::{
    BSplineTransform, BSplineWeightsFunction, PointTransformOutput, SparseJacobian, Transform,
    TransformDomain,
};
