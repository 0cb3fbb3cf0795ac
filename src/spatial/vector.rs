//! Vector type for representing spatial displacements and extents.
//!
//! Vectors represent displacements, physical extents, and grid spacing.

use nalgebra::SVector;

/// A vector in D-dimensional space.
///
/// This is a thin wrapper around nalgebra's SVector to provide
/// domain-specific functionality while maintaining all nalgebra operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const D: usize>(pub SVector<f64, D>);

impl<const D: usize> Vector<D> {
    /// Create a new vector from components.
    pub fn new(components: [f64; D]) -> Self {
        Self(SVector::from(components))
    }

    /// Create a zero vector.
    pub fn zeros() -> Self {
        Self(SVector::zeros())
    }

    /// Create a new vector from a slice of components.
    pub fn from_slice(components: &[f64]) -> Self {
        assert!(
            components.len() == D,
            "Component slice length must match dimension"
        );
        let mut vector = Self::zeros();
        for i in 0..D {
            vector.0[i] = components[i];
        }
        vector
    }

    /// Get the inner nalgebra vector.
    pub fn inner(&self) -> &SVector<f64, D> {
        &self.0
    }
}

impl<const D: usize> std::ops::Index<usize> for Vector<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Vector<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Add for Vector<D> {
    type Output = Vector<D>;

    fn add(self, rhs: Vector<D>) -> Self::Output {
        Vector(self.0 + rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_from_slice() {
        let v = Vector::<3>::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v, Vector::new([1.0, 2.0, 3.0]));
    }

    #[test]
    #[should_panic(expected = "Component slice length")]
    fn test_vector_from_slice_wrong_length() {
        let _ = Vector::<3>::from_slice(&[1.0, 2.0]);
    }
}
