//! B-spline deformable transform.
//!
//! The transform maps a point through a displacement field parameterized by
//! a sparse grid of control-point coefficients, `D` scalars per control
//! point. Coefficients arrive as one flat buffer: the concatenation of `D`
//! equal-length rasters (axis 0 fastest), one per spatial dimension.
//!
//! The buffer can be bound in one of two mutually exclusive modes:
//! * *reference* ([`BSplineTransform::set_parameters`]) — the transform
//!   keeps a non-owning view of a caller-supplied buffer; no copy is made
//!   and mutating calls such as [`BSplineTransform::set_identity`] write
//!   through to the caller's memory.
//! * *owned* ([`BSplineTransform::set_parameters_by_value`],
//!   [`BSplineTransform::set_coefficient_images`]) — values are copied into
//!   an internally managed buffer.
//!
//! Point queries are pure reads and may run concurrently from several
//! threads; binding, identity reset, and domain changes are exclusive
//! writes (`&mut self`).

use crate::error::{Result, TransformError};
use crate::grid::{CoefficientImage, GridGeometry};
use crate::spatial::{Point, Vector};
use crate::transform::domain::TransformDomain;
use crate::transform::trait_::Transform;
use crate::transform::weights::BSplineWeightsFunction;

/// How the flat coefficient buffer is held.
#[derive(Debug)]
enum CoefficientStorage<'a> {
    /// No parameters bound yet.
    Unbound,
    /// Non-owning view of a caller-owned buffer.
    Referenced(&'a mut [f64]),
    /// Internally owned copy.
    Owned(Vec<f64>),
}

impl CoefficientStorage<'_> {
    fn as_slice(&self) -> Option<&[f64]> {
        match self {
            CoefficientStorage::Unbound => None,
            CoefficientStorage::Referenced(buffer) => Some(buffer),
            CoefficientStorage::Owned(buffer) => Some(buffer),
        }
    }

    fn as_mut_slice(&mut self) -> Option<&mut [f64]> {
        match self {
            CoefficientStorage::Unbound => None,
            CoefficientStorage::Referenced(buffer) => Some(buffer),
            CoefficientStorage::Owned(buffer) => Some(buffer),
        }
    }
}

/// Result of a detailed point query.
///
/// Carries the raw weights and support indices alongside the transformed
/// point so that Jacobian assembly can reuse them without recomputation.
/// For an outside point `inside` is false, the point is returned unchanged,
/// and `weights`/`indices` are empty.
#[derive(Debug, Clone)]
pub struct PointTransformOutput<const D: usize> {
    /// The transformed point (input point when outside).
    pub point: Point<D>,
    /// Whether the input point lies in the valid interior of the grid.
    pub inside: bool,
    /// Basis weights over the support region, axis 0 fastest.
    pub weights: Vec<f64>,
    /// Flat support offsets into a single coefficient grid, parallel to
    /// `weights`. Offsets for spatial dimension d of the full parameter
    /// buffer are `indices[j] + d * number_of_parameters_per_dimension`.
    pub indices: Vec<usize>,
}

/// Sparse Jacobian of the transformed point with respect to the parameters.
///
/// Row d (output dimension) has nonzero entries only at columns
/// `indices[j] + d * parameters_per_dimension`, with values equal to the
/// basis weights; every other entry is exactly zero. The dense matrix is
/// never materialized.
#[derive(Debug, Clone)]
pub struct SparseJacobian<const D: usize> {
    indices: Vec<usize>,
    weights: Vec<f64>,
    parameters_per_dimension: usize,
}

impl<const D: usize> SparseJacobian<D> {
    fn empty(parameters_per_dimension: usize) -> Self {
        Self {
            indices: Vec::new(),
            weights: Vec::new(),
            parameters_per_dimension,
        }
    }

    /// Flat support offsets into one coefficient grid.
    pub fn support_indices(&self) -> &[usize] {
        &self.indices
    }

    /// Basis weights parallel to [`support_indices`](Self::support_indices).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of parameters per spatial dimension.
    pub fn parameters_per_dimension(&self) -> usize {
        self.parameters_per_dimension
    }

    /// Total number of columns (`D * parameters_per_dimension`).
    pub fn number_of_parameters(&self) -> usize {
        D * self.parameters_per_dimension
    }

    /// True when the queried point was outside the valid interior.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Entry at (row, column) of the virtual dense Jacobian.
    pub fn value(&self, row: usize, column: usize) -> f64 {
        if column / self.parameters_per_dimension != row {
            return 0.0;
        }
        let local = column % self.parameters_per_dimension;
        self.indices
            .iter()
            .position(|&index| index == local)
            .map(|j| self.weights[j])
            .unwrap_or(0.0)
    }

    /// Iterate over the nonzero entries as (row, column, value).
    pub fn nonzeros(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..D).flat_map(move |row| {
            self.indices
                .iter()
                .zip(&self.weights)
                .map(move |(&index, &weight)| {
                    (row, row * self.parameters_per_dimension + index, weight)
                })
        })
    }
}

/// Deformable transform using a B-spline representation of degree `ORDER`.
///
/// Lifecycle: set the domain first, then bind parameters, then query
/// points. Calls out of this order return
/// [`TransformError::InvalidConfiguration`]. Re-setting the domain
/// invalidates any bound parameters; they must be rebound.
///
/// The lifetime parameter only matters in reference mode; owned-mode users
/// can write `BSplineTransform<'static, D>`.
#[derive(Debug)]
pub struct BSplineTransform<'a, const D: usize, const ORDER: usize = 3> {
    domain: Option<TransformDomain<D>>,
    geometry: Option<GridGeometry<D>>,
    storage: CoefficientStorage<'a>,
    weights_function: BSplineWeightsFunction<D, ORDER>,
}

impl<const D: usize, const ORDER: usize> Default for BSplineTransform<'_, D, ORDER> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const D: usize, const ORDER: usize> BSplineTransform<'a, D, ORDER> {
    /// Create a transform with no domain and no parameters bound.
    pub fn new() -> Self {
        Self {
            domain: None,
            geometry: None,
            storage: CoefficientStorage::Unbound,
            weights_function: BSplineWeightsFunction::new(),
        }
    }

    /// Set the transform domain.
    ///
    /// Recomputes the derived grid geometry and unbinds any previously
    /// bound parameters: the old wrapping is no longer valid over the new
    /// geometry.
    pub fn set_domain(&mut self, domain: TransformDomain<D>) {
        self.geometry = Some(domain.grid_geometry(ORDER));
        self.domain = Some(domain);
        self.storage = CoefficientStorage::Unbound;
    }

    /// The current transform domain, if set.
    pub fn domain(&self) -> Option<&TransformDomain<D>> {
        self.domain.as_ref()
    }

    /// The derived control-point grid geometry.
    pub fn grid_geometry(&self) -> Result<&GridGeometry<D>> {
        self.geometry.as_ref().ok_or_else(|| {
            TransformError::invalid_configuration(
                "transform domain must be set before coefficient operations",
            )
        })
    }

    /// Number of parameters per spatial dimension (grid nodes).
    pub fn number_of_parameters_per_dimension(&self) -> Result<usize> {
        Ok(self.grid_geometry()?.number_of_nodes())
    }

    /// Total number of parameters (`D * parameters per dimension`).
    pub fn number_of_parameters(&self) -> Result<usize> {
        Ok(D * self.number_of_parameters_per_dimension()?)
    }

    /// Number of weights per point query: `(ORDER + 1)^D`.
    pub fn number_of_weights(&self) -> usize {
        BSplineWeightsFunction::<D, ORDER>::number_of_weights()
    }

    /// Bind a caller-owned flat coefficient buffer without copying.
    ///
    /// The transform keeps a non-owning view for its lifetime; the buffer
    /// is the concatenation of `D` rasters (axis 0 fastest), one per
    /// spatial dimension. Mutating calls, notably
    /// [`set_identity`](Self::set_identity), write through to this buffer,
    /// and the caller observes those writes once the transform releases the
    /// borrow.
    pub fn set_parameters(&mut self, parameters: &'a mut [f64]) -> Result<()> {
        self.check_parameter_length(parameters.len())?;
        self.storage = CoefficientStorage::Referenced(parameters);
        Ok(())
    }

    /// Bind a flat coefficient buffer by copying it into the transform.
    pub fn set_parameters_by_value(&mut self, parameters: &[f64]) -> Result<()> {
        self.check_parameter_length(parameters.len())?;
        self.storage = CoefficientStorage::Owned(parameters.to_vec());
        Ok(())
    }

    /// Bind coefficients by copying values out of `D` coefficient images.
    ///
    /// All images must share the geometry derived from the current domain.
    /// Only the values are read; the images stay with the caller.
    pub fn set_coefficient_images(&mut self, images: &[CoefficientImage<D>; D]) -> Result<()> {
        let geometry = self.grid_geometry()?;
        for (d, image) in images.iter().enumerate() {
            if image.geometry() != geometry {
                return Err(TransformError::dimension_mismatch(format!(
                    "coefficient image {} does not match the grid geometry of the current domain",
                    d
                )));
            }
        }
        let per_dimension = geometry.number_of_nodes();
        let mut buffer = Vec::with_capacity(D * per_dimension);
        for image in images {
            buffer.extend_from_slice(image.data());
        }
        self.storage = CoefficientStorage::Owned(buffer);
        Ok(())
    }

    /// Read view of the bound parameters, whatever the active mode.
    pub fn parameters(&self) -> Result<&[f64]> {
        self.storage.as_slice().ok_or_else(unbound_error)
    }

    /// Mutable view of the bound parameters.
    ///
    /// In reference mode this aliases the caller's buffer.
    pub fn parameters_mut(&mut self) -> Result<&mut [f64]> {
        self.storage.as_mut_slice().ok_or_else(unbound_error)
    }

    /// Export the bound coefficients as `D` owned coefficient images.
    pub fn coefficient_images(&self) -> Result<[CoefficientImage<D>; D]> {
        let geometry = self.grid_geometry()?.clone();
        let parameters = self.parameters()?;
        let per_dimension = geometry.number_of_nodes();
        Ok(std::array::from_fn(|d| {
            CoefficientImage::from_parts(
                geometry.clone(),
                parameters[d * per_dimension..(d + 1) * per_dimension].to_vec(),
            )
        }))
    }

    /// Reset the transform to the identity by zeroing every coefficient.
    ///
    /// Works in either binding mode and mutates whatever buffer is
    /// currently aliased; in reference mode that is the caller's buffer.
    pub fn set_identity(&mut self) -> Result<()> {
        let buffer = self.storage.as_mut_slice().ok_or_else(|| {
            TransformError::invalid_configuration(
                "set_identity requires parameters to be bound first",
            )
        })?;
        buffer.fill(0.0);
        Ok(())
    }

    /// Encode the grid geometry as a flat fixed-parameter vector.
    ///
    /// Layout: grid size, grid origin, grid spacing, direction (row-major);
    /// numerically interchangeable with the domain setters.
    pub fn fixed_parameters(&self) -> Result<Vec<f64>> {
        Ok(self.grid_geometry()?.to_fixed_parameters())
    }

    /// Configure the transform from a flat fixed-parameter vector.
    ///
    /// Equivalent to [`set_domain`](Self::set_domain) with the domain
    /// reconstructed from the encoded grid geometry; unbinds any bound
    /// parameters.
    pub fn set_fixed_parameters(&mut self, fixed: &[f64]) -> Result<()> {
        let geometry = GridGeometry::from_fixed_parameters(fixed)?;
        let domain = TransformDomain::from_grid_geometry(&geometry, ORDER)?;
        self.domain = Some(domain);
        self.geometry = Some(geometry);
        self.storage = CoefficientStorage::Unbound;
        Ok(())
    }

    /// Transform a point through the deformation field.
    ///
    /// Points outside the valid interior are returned unchanged (identity
    /// fallback); use [`transform_point_detailed`](Self::transform_point_detailed)
    /// for the explicit inside/outside flag.
    pub fn transform_point(&self, point: &Point<D>) -> Result<Point<D>> {
        Ok(self.transform_point_detailed(point)?.point)
    }

    /// Transform a point, additionally returning the inside flag and the
    /// raw weights and support indices used.
    pub fn transform_point_detailed(&self, point: &Point<D>) -> Result<PointTransformOutput<D>> {
        let geometry = self.grid_geometry()?;
        let parameters = self.parameters()?;
        let index = geometry.continuous_index(point);

        let support = match self.weights_function.evaluate(&index, geometry) {
            Some(support) => support,
            None => {
                return Ok(PointTransformOutput {
                    point: *point,
                    inside: false,
                    weights: Vec::new(),
                    indices: Vec::new(),
                })
            }
        };

        let per_dimension = geometry.number_of_nodes();
        let mut output = *point;
        for d in 0..D {
            let block = &parameters[d * per_dimension..(d + 1) * per_dimension];
            let mut displacement = 0.0;
            for (weight, &offset) in support.weights.iter().zip(&support.indices) {
                displacement += weight * block[offset];
            }
            output[d] += displacement;
        }

        Ok(PointTransformOutput {
            point: output,
            inside: true,
            weights: support.weights,
            indices: support.indices,
        })
    }

    /// Sparse Jacobian of the transformed point with respect to the
    /// parameters.
    ///
    /// The entries depend only on the queried point and the grid geometry,
    /// not on the coefficient values, so only the domain needs to be set.
    /// Outside the valid interior the Jacobian is empty (all zero).
    pub fn jacobian_with_respect_to_parameters(
        &self,
        point: &Point<D>,
    ) -> Result<SparseJacobian<D>> {
        let geometry = self.grid_geometry()?;
        let per_dimension = geometry.number_of_nodes();
        let index = geometry.continuous_index(point);
        match self.weights_function.evaluate(&index, geometry) {
            None => Ok(SparseJacobian::empty(per_dimension)),
            Some(support) => Ok(SparseJacobian {
                indices: support.indices,
                weights: support.weights,
                parameters_per_dimension: per_dimension,
            }),
        }
    }

    fn check_parameter_length(&self, length: usize) -> Result<()> {
        let expected = self.number_of_parameters()?;
        if length != expected {
            return Err(TransformError::dimension_mismatch(format!(
                "parameter buffer has length {}, current domain requires {}",
                length, expected
            )));
        }
        Ok(())
    }
}

fn unbound_error() -> TransformError {
    TransformError::invalid_configuration("no parameters are bound to the transform")
}

impl<const D: usize, const ORDER: usize> Transform<D> for BSplineTransform<'_, D, ORDER> {
    fn transform_point(&self, point: &Point<D>) -> Result<Point<D>> {
        BSplineTransform::transform_point(self, point)
    }

    fn is_linear(&self) -> bool {
        false
    }

    fn transform_vector(&self, _vector: &Vector<D>) -> Result<Vector<D>> {
        Err(TransformError::unsupported_operation(
            "transform_vector is not applicable to a deformable transform; \
             use the position-specific Jacobian instead",
        ))
    }

    fn transform_covariant_vector(&self, _vector: &Vector<D>) -> Result<Vector<D>> {
        Err(TransformError::unsupported_operation(
            "transform_covariant_vector is not applicable to a deformable transform; \
             use the position-specific Jacobian instead",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Direction;

    fn unit_domain() -> TransformDomain<2> {
        TransformDomain::new(
            Point::new([0.0, 0.0]),
            Vector::new([1.0, 1.0]),
            Direction::identity(),
            [1, 1],
        )
        .unwrap()
    }

    #[test]
    fn test_binding_requires_domain() {
        let mut transform = BSplineTransform::<2>::new();
        let err = transform.set_parameters_by_value(&[0.0; 32]).unwrap_err();
        assert!(matches!(err, TransformError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_parameter_length_checked() {
        let mut transform = BSplineTransform::<2>::new();
        transform.set_domain(unit_domain());
        // 4x4 grid, two dimensions: 32 parameters expected
        let err = transform.set_parameters_by_value(&[0.0; 16]).unwrap_err();
        assert!(matches!(err, TransformError::DimensionMismatch(_)));
        assert!(transform.set_parameters_by_value(&[0.0; 32]).is_ok());
    }

    #[test]
    fn test_set_identity_requires_binding() {
        let mut transform = BSplineTransform::<2>::new();
        transform.set_domain(unit_domain());
        let err = transform.set_identity().unwrap_err();
        assert!(matches!(err, TransformError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rebinding_switches_modes() {
        let mut buffer = vec![0.25; 32];
        let mut transform = BSplineTransform::<2>::new();
        transform.set_domain(unit_domain());
        transform.set_parameters(&mut buffer).unwrap();
        assert_eq!(transform.parameters().unwrap()[0], 0.25);
        // owned re-bind releases the reference and copies the new values
        transform.set_parameters_by_value(&[0.5; 32]).unwrap();
        assert_eq!(transform.parameters().unwrap()[0], 0.5);
        assert_eq!(buffer[0], 0.25);
    }

    #[test]
    fn test_domain_change_unbinds() {
        let mut transform = BSplineTransform::<2>::new();
        transform.set_domain(unit_domain());
        transform.set_parameters_by_value(&[0.0; 32]).unwrap();
        transform.set_domain(unit_domain());
        assert!(transform.parameters().is_err());
    }

    #[test]
    fn test_vector_transforms_unsupported() {
        let transform = BSplineTransform::<'static, 2>::new();
        let err = Transform::transform_vector(&transform, &Vector::new([1.0, 0.0])).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedOperation(_)));
        let err =
            Transform::transform_covariant_vector(&transform, &Vector::new([1.0, 0.0])).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedOperation(_)));
        assert!(!Transform::is_linear(&transform));
    }

    #[test]
    fn test_coefficient_images_roundtrip() {
        let mut transform = BSplineTransform::<2>::new();
        transform.set_domain(unit_domain());
        let parameters: Vec<f64> = (0..32).map(|i| i as f64).collect();
        transform.set_parameters_by_value(&parameters).unwrap();

        let images = transform.coefficient_images().unwrap();
        assert_eq!(images[0].data(), &parameters[..16]);
        assert_eq!(images[1].data(), &parameters[16..]);

        let mut other = BSplineTransform::<2>::new();
        other.set_domain(unit_domain());
        other.set_coefficient_images(&images).unwrap();
        assert_eq!(other.parameters().unwrap(), &parameters[..]);
    }

    #[test]
    fn test_coefficient_images_geometry_checked() {
        let mut transform = BSplineTransform::<2>::new();
        transform.set_domain(unit_domain());

        let other_geometry = TransformDomain::new(
            Point::new([0.0, 0.0]),
            Vector::new([2.0, 2.0]),
            Direction::identity(),
            [1, 1],
        )
        .unwrap()
        .grid_geometry(3);
        let images = std::array::from_fn(|_| {
            CoefficientImage::new(other_geometry.clone(), vec![0.0; 16]).unwrap()
        });
        let err = transform.set_coefficient_images(&images).unwrap_err();
        assert!(matches!(err, TransformError::DimensionMismatch(_)));
    }

    #[test]
    fn test_fixed_parameters_match_domain_setters() {
        let mut via_domain = BSplineTransform::<2>::new();
        via_domain.set_domain(unit_domain());
        let fixed = via_domain.fixed_parameters().unwrap();

        let mut via_fixed = BSplineTransform::<2>::new();
        via_fixed.set_fixed_parameters(&fixed).unwrap();
        assert_eq!(
            via_fixed.grid_geometry().unwrap(),
            via_domain.grid_geometry().unwrap()
        );
        assert_eq!(via_fixed.domain().unwrap().mesh_size(), [1, 1]);
        assert_eq!(via_fixed.fixed_parameters().unwrap(), fixed);
    }
}
