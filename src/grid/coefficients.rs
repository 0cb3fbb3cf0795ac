//! Owned coefficient raster over a grid geometry.

use crate::error::{Result, TransformError};
use crate::grid::GridGeometry;

/// A scalar raster of coefficients over a control-point grid.
///
/// One coefficient image holds the displacement component for a single
/// spatial dimension. A transform is parameterized by D such images sharing
/// identical geometry.
///
/// Values are stored in row-major order with axis 0 fastest, matching the
/// flat-buffer layout of the transform parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientImage<const D: usize> {
    geometry: GridGeometry<D>,
    data: Vec<f64>,
}

impl<const D: usize> CoefficientImage<D> {
    /// Create a coefficient image from a geometry and a flat data buffer.
    ///
    /// The buffer length must equal the number of grid nodes.
    pub fn new(geometry: GridGeometry<D>, data: Vec<f64>) -> Result<Self> {
        if data.len() != geometry.number_of_nodes() {
            return Err(TransformError::dimension_mismatch(format!(
                "coefficient buffer has length {}, grid has {} nodes",
                data.len(),
                geometry.number_of_nodes()
            )));
        }
        Ok(Self { geometry, data })
    }

    pub(crate) fn from_parts(geometry: GridGeometry<D>, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), geometry.number_of_nodes());
        Self { geometry, data }
    }

    /// Geometry of the underlying grid.
    pub fn geometry(&self) -> &GridGeometry<D> {
        &self.geometry
    }

    /// Flat view of the coefficient values (axis 0 fastest).
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at a multi-index.
    pub fn value(&self, index: [usize; D]) -> f64 {
        self.data[self.geometry.flatten_index(index)]
    }
}
