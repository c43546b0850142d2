use burn::prelude::*;

use crate::domain::shape;

/// Number of features per sample: the product of every non-batch
/// dimension of `x`.
pub fn num_flat_features<B: Backend, const D: usize>(x: &Tensor<B, D>) -> usize {
    shape::num_flat_features(&x.dims())
}
