//! Transform domain: the physical region covered by the deformation.
//!
//! The domain fixes origin, physical extent, direction, and B-spline mesh
//! size, from which the control-point grid geometry is derived. The mesh
//! size is the number of polynomial patches per axis, so the derived grid
//! has `mesh_size[d] + spline_order` control points along axis d, enough
//! for every interior point to carry a full local support window.

use crate::error::{Result, TransformError};
use crate::grid::GridGeometry;
use crate::spatial::{Direction, Point, Vector};

/// Physical domain of a grid-based deformable transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformDomain<const D: usize> {
    origin: Point<D>,
    physical_dimensions: Vector<D>,
    direction: Direction<D>,
    mesh_size: [usize; D],
}

impl<const D: usize> TransformDomain<D> {
    /// Create a new transform domain.
    ///
    /// # Arguments
    /// * `origin` - Physical coordinate of the domain corner
    /// * `physical_dimensions` - Physical extent along each axis (must be positive)
    /// * `direction` - Orthonormal orientation of the domain axes
    /// * `mesh_size` - Number of B-spline patches per axis (each entry >= 1)
    pub fn new(
        origin: Point<D>,
        physical_dimensions: Vector<D>,
        direction: Direction<D>,
        mesh_size: [usize; D],
    ) -> Result<Self> {
        check_mesh_size(&mesh_size)?;
        check_physical_dimensions(&physical_dimensions)?;
        check_direction(&direction)?;
        Ok(Self {
            origin,
            physical_dimensions,
            direction,
            mesh_size,
        })
    }

    /// Physical coordinate of the domain corner.
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Physical extent of the domain along each axis.
    pub fn physical_dimensions(&self) -> &Vector<D> {
        &self.physical_dimensions
    }

    /// Orientation of the domain axes.
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Number of B-spline patches per axis.
    pub fn mesh_size(&self) -> [usize; D] {
        self.mesh_size
    }

    /// Set the domain origin.
    pub fn set_origin(&mut self, origin: Point<D>) {
        self.origin = origin;
    }

    /// Set the physical extent of the domain.
    pub fn set_physical_dimensions(&mut self, physical_dimensions: Vector<D>) -> Result<()> {
        check_physical_dimensions(&physical_dimensions)?;
        self.physical_dimensions = physical_dimensions;
        Ok(())
    }

    /// Set the orientation of the domain axes.
    pub fn set_direction(&mut self, direction: Direction<D>) -> Result<()> {
        check_direction(&direction)?;
        self.direction = direction;
        Ok(())
    }

    /// Set the mesh size.
    pub fn set_mesh_size(&mut self, mesh_size: [usize; D]) -> Result<()> {
        check_mesh_size(&mesh_size)?;
        self.mesh_size = mesh_size;
        Ok(())
    }

    /// Derive the control-point grid geometry for a given spline order.
    ///
    /// The grid has `mesh_size[d] + spline_order` nodes per axis, spaced
    /// `physical_dimensions[d] / mesh_size[d]` apart, and its origin sits
    /// `(spline_order - 1) / 2` spacings before the domain origin along
    /// each direction-rotated axis. The domain corner therefore maps to the
    /// continuous index `(spline_order - 1) / 2` on every axis.
    pub fn grid_geometry(&self, spline_order: usize) -> GridGeometry<D> {
        let mut size = [0usize; D];
        let mut spacing = Vector::zeros();
        let mut offset = Vector::zeros();
        for d in 0..D {
            size[d] = self.mesh_size[d] + spline_order;
            spacing[d] = self.physical_dimensions[d] / self.mesh_size[d] as f64;
            offset[d] = -spacing[d] * 0.5 * (spline_order as f64 - 1.0);
        }
        let origin = self.origin + self.direction.apply(&offset);
        GridGeometry::new(size, origin, spacing, self.direction)
    }

    /// Reconstruct the domain from a grid geometry and spline order.
    ///
    /// Inverse of [`TransformDomain::grid_geometry`]; used when the
    /// transform is configured from a raw fixed-parameter vector.
    pub fn from_grid_geometry(geometry: &GridGeometry<D>, spline_order: usize) -> Result<Self> {
        let size = geometry.size();
        let mut mesh_size = [0usize; D];
        let mut physical_dimensions = Vector::zeros();
        let mut offset = Vector::zeros();
        for d in 0..D {
            mesh_size[d] = size[d].checked_sub(spline_order).ok_or_else(|| {
                TransformError::invalid_configuration(format!(
                    "grid size {} along axis {} is smaller than spline order {}",
                    size[d], d, spline_order
                ))
            })?;
            let spacing = geometry.spacing()[d];
            physical_dimensions[d] = spacing * mesh_size[d] as f64;
            offset[d] = spacing * 0.5 * (spline_order as f64 - 1.0);
        }
        let origin = *geometry.origin() + geometry.direction().apply(&offset);
        Self::new(origin, physical_dimensions, *geometry.direction(), mesh_size)
    }
}

fn check_mesh_size<const D: usize>(mesh_size: &[usize; D]) -> Result<()> {
    if let Some(d) = (0..D).find(|&d| mesh_size[d] == 0) {
        return Err(TransformError::invalid_configuration(format!(
            "mesh size entry along axis {} is zero; every axis needs at least one patch",
            d
        )));
    }
    Ok(())
}

fn check_physical_dimensions<const D: usize>(physical_dimensions: &Vector<D>) -> Result<()> {
    if let Some(d) = (0..D).find(|&d| physical_dimensions[d] <= 0.0) {
        return Err(TransformError::invalid_configuration(format!(
            "physical dimension along axis {} is not positive: {}",
            d, physical_dimensions[d]
        )));
    }
    Ok(())
}

fn check_direction<const D: usize>(direction: &Direction<D>) -> Result<()> {
    if !direction.is_orthogonal() {
        return Err(TransformError::invalid_configuration(
            "direction matrix is not orthonormal",
        ));
    }
    Ok(())
}
