//! Control-point grid geometry.
//!
//! This module provides the derived fixed-parameter set of a grid
//! transform: size, origin, spacing, and direction of the control-point
//! grid, together with the index arithmetic every other component uses.

use crate::error::{Result, TransformError};
use crate::spatial::{Direction, Point, Vector};

/// Geometry of the control-point grid.
///
/// The grid is a regular raster of control points. Coefficient buffers over
/// it are laid out in row-major order with axis 0 fastest, mirroring how an
/// image buffer is laid out.
///
/// The geometry is also serializable as a flat fixed-parameter vector of
/// length `3 * D + D * D`: grid size, grid origin, grid spacing, then the
/// direction matrix in row-major order. This vector is numerically
/// equivalent to the transform-domain setters and is the interchange format
/// for transform readers/writers.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry<const D: usize> {
    size: [usize; D],
    origin: Point<D>,
    spacing: Vector<D>,
    direction: Direction<D>,
    direction_inverse: Direction<D>,
}

impl<const D: usize> GridGeometry<D> {
    /// Create a new grid geometry.
    ///
    /// The direction matrix must be orthonormal; its inverse is taken as
    /// the transpose.
    pub fn new(
        size: [usize; D],
        origin: Point<D>,
        spacing: Vector<D>,
        direction: Direction<D>,
    ) -> Self {
        Self {
            size,
            origin,
            spacing,
            direction_inverse: direction.transpose(),
            direction,
        }
    }

    /// Grid size (number of control points) along each axis.
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    /// Physical coordinate of the control point at index zero.
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Physical distance between adjacent control points along each axis.
    pub fn spacing(&self) -> &Vector<D> {
        &self.spacing
    }

    /// Orientation of the grid axes in physical space.
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Total number of control points in the grid.
    pub fn number_of_nodes(&self) -> usize {
        self.size.iter().product()
    }

    /// Raster strides, axis 0 fastest.
    pub fn strides(&self) -> [usize; D] {
        let mut strides = [1usize; D];
        for d in 1..D {
            strides[d] = strides[d - 1] * self.size[d - 1];
        }
        strides
    }

    /// Flatten a multi-index into a raster offset (axis 0 fastest).
    pub fn flatten_index(&self, index: [usize; D]) -> usize {
        let strides = self.strides();
        (0..D).map(|d| index[d] * strides[d]).sum()
    }

    /// Map a physical point to a continuous grid index.
    ///
    /// `index = Direction^-1 * (point - origin) / spacing`, component-wise.
    pub fn continuous_index(&self, point: &Point<D>) -> [f64; D] {
        let relative = *point - self.origin;
        let rotated = self.direction_inverse.apply(&relative);
        std::array::from_fn(|d| rotated[d] / self.spacing[d])
    }

    /// Encode the geometry as a flat fixed-parameter vector.
    ///
    /// Layout: size, origin, spacing, direction (row-major).
    pub fn to_fixed_parameters(&self) -> Vec<f64> {
        let mut fixed = Vec::with_capacity(3 * D + D * D);
        fixed.extend((0..D).map(|d| self.size[d] as f64));
        fixed.extend((0..D).map(|d| self.origin[d]));
        fixed.extend((0..D).map(|d| self.spacing[d]));
        fixed.extend(self.direction.to_row_major());
        fixed
    }

    /// Rebuild a geometry from a flat fixed-parameter vector.
    pub fn from_fixed_parameters(fixed: &[f64]) -> Result<Self> {
        let expected = 3 * D + D * D;
        if fixed.len() != expected {
            return Err(TransformError::dimension_mismatch(format!(
                "fixed parameter vector has length {}, expected {}",
                fixed.len(),
                expected
            )));
        }
        let mut size = [0usize; D];
        for d in 0..D {
            let value = fixed[d];
            if value < 1.0 || value.fract() != 0.0 {
                return Err(TransformError::invalid_configuration(format!(
                    "fixed parameter grid size entry {} is not a positive integer: {}",
                    d, value
                )));
            }
            size[d] = value as usize;
        }
        let origin = Point::new(std::array::from_fn(|d| fixed[D + d]));
        let spacing = Vector::from_slice(&fixed[2 * D..3 * D]);
        let direction = Direction::from_row_major(&fixed[3 * D..]);
        Ok(Self::new(size, origin, spacing, direction))
    }
}
