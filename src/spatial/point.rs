//! Point type for representing spatial coordinates.
//!
//! Points represent positions in physical space.

use super::Vector;
use nalgebra::Point as NaPoint;
use serde::{Deserialize, Serialize};

/// A point in D-dimensional physical space.
///
/// This is a thin wrapper around nalgebra's Point to provide
/// domain-specific functionality while maintaining all nalgebra operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<const D: usize>(pub NaPoint<f64, D>);

impl<const D: usize> Point<D> {
    /// Create a new point from coordinates.
    pub fn new(coordinates: [f64; D]) -> Self {
        Self(NaPoint::from(coordinates))
    }

    /// Create the point at the coordinate origin.
    pub fn origin() -> Self {
        Self(NaPoint::origin())
    }

    /// Get the inner nalgebra point.
    pub fn inner(&self) -> &NaPoint<f64, D> {
        &self.0
    }
}

impl<const D: usize> std::ops::Index<usize> for Point<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Point<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Add<Vector<D>> for Point<D> {
    type Output = Point<D>;

    fn add(self, rhs: Vector<D>) -> Self::Output {
        Point(self.0 + rhs.0)
    }
}

impl<const D: usize> std::ops::Sub<Point<D>> for Point<D> {
    type Output = Vector<D>;

    fn sub(self, rhs: Point<D>) -> Self::Output {
        Vector(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new([1.0, 2.0]);
        let q = Point::new([0.5, 0.5]);
        let v = p - q;
        assert_eq!(v, Vector::new([0.5, 1.5]));
        assert_eq!(q + v, p);
    }

    #[test]
    fn test_point_indexing() {
        let mut p = Point::new([1.0, 2.0, 3.0]);
        p[2] += 1.0;
        assert_eq!(p[0], 1.0);
        assert_eq!(p[2], 4.0);
    }
}
