//! Spatial types for representing points, vectors, and direction matrices.
//!
//! All types are thin wrappers over nalgebra for efficient linear algebra
//! operations while keeping the domain vocabulary explicit.

pub mod direction;
pub mod point;
pub mod vector;

pub use direction::Direction;
pub use point::Point;
pub use vector::Vector;

// Common type aliases for 2D and 3D
pub type Point2 = Point<2>;
pub type Point3 = Point<3>;
pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;
pub type Direction2 = Direction<2>;
pub type Direction3 = Direction<3>;
