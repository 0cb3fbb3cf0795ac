//! B-spline interpolation weights over the local support region.
//!
//! Given a continuous grid index, the weights function decides whether the
//! index lies in the valid interior of the grid, locates the
//! `(order + 1)^D` control points whose basis functions are nonzero there,
//! and evaluates the tensor-product basis weights. Weights and support
//! indices are enumerated in the same fixed order: lexicographic with
//! axis 0 fastest, matching the raster layout of the coefficient buffers.

use crate::grid::GridGeometry;

/// Support region and basis weights for one continuous index.
#[derive(Debug, Clone)]
pub struct SupportWeights<const D: usize> {
    /// Multi-index of the first control point of the support window.
    pub start_index: [usize; D],
    /// Tensor-product basis weights, axis 0 fastest.
    pub weights: Vec<f64>,
    /// Flat raster offsets of the support control points, parallel to
    /// `weights`. Offsets address a single coefficient grid; the offsets
    /// for spatial dimension d of the flat parameter buffer are obtained
    /// by adding `d * number_of_parameters_per_dimension`.
    pub indices: Vec<usize>,
}

/// Weights function for a cardinal B-spline basis of degree `ORDER`.
///
/// Stateless; all geometry comes in through [`evaluate`](Self::evaluate).
#[derive(Debug, Clone, Copy, Default)]
pub struct BSplineWeightsFunction<const D: usize, const ORDER: usize>;

impl<const D: usize, const ORDER: usize> BSplineWeightsFunction<D, ORDER> {
    /// Create a new weights function.
    pub fn new() -> Self {
        Self
    }

    /// Number of weights in a support region: `(ORDER + 1)^D`.
    pub const fn number_of_weights() -> usize {
        (ORDER + 1).pow(D as u32)
    }

    /// Check whether a continuous index has a full support window.
    ///
    /// The valid interior is `(ORDER - 1)/2 <= index[d] <= size[d] -
    /// (ORDER + 1)/2` on every axis; the margins are the control points
    /// that pad the domain so interior windows never clip.
    pub fn inside_valid_region(&self, index: &[f64; D], geometry: &GridGeometry<D>) -> bool {
        let size = geometry.size();
        (0..D).all(|d| {
            let lower = 0.5 * (ORDER as f64 - 1.0);
            let upper = size[d] as f64 - 0.5 * (ORDER as f64 + 1.0);
            index[d] >= lower && index[d] <= upper
        })
    }

    /// Compute support indices and weights for a continuous index.
    ///
    /// Returns `None` when the index lies outside the valid interior; this
    /// is a routine outcome near the domain boundary, not an error.
    ///
    /// For any index strictly inside the valid interior the weights sum to
    /// one (partition of unity of the cardinal B-spline basis).
    pub fn evaluate(
        &self,
        index: &[f64; D],
        geometry: &GridGeometry<D>,
    ) -> Option<SupportWeights<D>> {
        if !self.inside_valid_region(index, geometry) {
            return None;
        }
        let size = geometry.size();
        let half = 0.5 * (ORDER as f64 - 1.0);

        let mut start_index = [0usize; D];
        // Per-axis 1-D weights, one row of ORDER + 1 values per axis.
        let mut axis_weights = vec![0.0f64; D * (ORDER + 1)];
        for d in 0..D {
            let mut start = (index[d] - half).floor() as i64;
            // At the exact upper bound of the valid interior the floored
            // window overhangs the grid by one node; shifting it down drops
            // only a zero weight, so the result stays exact.
            if start + ORDER as i64 > size[d] as i64 - 1 {
                start = size[d] as i64 - 1 - ORDER as i64;
            }
            start_index[d] = start as usize;
            for i in 0..=ORDER {
                axis_weights[d * (ORDER + 1) + i] =
                    cardinal_bspline(ORDER, index[d] - (start + i as i64) as f64);
            }
        }

        let count = Self::number_of_weights();
        let strides = geometry.strides();
        let mut weights = Vec::with_capacity(count);
        let mut indices = Vec::with_capacity(count);
        for j in 0..count {
            let mut remainder = j;
            let mut weight = 1.0;
            let mut flat = 0usize;
            for d in 0..D {
                let offset = remainder % (ORDER + 1);
                remainder /= ORDER + 1;
                weight *= axis_weights[d * (ORDER + 1) + offset];
                flat += (start_index[d] + offset) * strides[d];
            }
            weights.push(weight);
            indices.push(flat);
        }

        Some(SupportWeights {
            start_index,
            weights,
            indices,
        })
    }
}

/// Cardinal B-spline of degree `order`, centered at zero.
///
/// Closed forms for the orders in common use, Cox-de Boor recursion above
/// cubic. Support is `|t| <= (order + 1) / 2`.
pub fn cardinal_bspline(order: usize, t: f64) -> f64 {
    match order {
        0 => {
            if (-0.5..0.5).contains(&t) {
                1.0
            } else {
                0.0
            }
        }
        1 => {
            let a = t.abs();
            if a < 1.0 {
                1.0 - a
            } else {
                0.0
            }
        }
        2 => {
            let a = t.abs();
            if a <= 0.5 {
                0.75 - a * a
            } else if a < 1.5 {
                let b = 1.5 - a;
                0.5 * b * b
            } else {
                0.0
            }
        }
        3 => {
            let a = t.abs();
            if a < 1.0 {
                2.0 / 3.0 - a * a + 0.5 * a * a * a
            } else if a < 2.0 {
                let b = 2.0 - a;
                b * b * b / 6.0
            } else {
                0.0
            }
        }
        order => {
            let k = order as f64;
            let left = (t + (k + 1.0) * 0.5) / k;
            let right = ((k + 1.0) * 0.5 - t) / k;
            left * cardinal_bspline(order - 1, t + 0.5) + right * cardinal_bspline(order - 1, t - 0.5)
        }
    }
}
