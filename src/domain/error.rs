// ============================================================
// Layer 3 - ModelError
// ============================================================
// Every way model construction or a forward pass can be
// rejected before the tensor framework is asked to do work.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("Input {height}x{width} is too small: {stage} would produce an empty feature map")]
    InputTooSmall {
        height: usize,
        width:  usize,
        stage:  &'static str,
    },

    #[error("Input {height}x{width} is too large: a feature map would overflow usize")]
    InputTooLarge { height: usize, width: usize },

    #[error("Batch of {batch} {height}x{width} inputs is too large to allocate")]
    BatchTooLarge { batch: usize, height: usize, width: usize },

    #[error("Expected {expected} input channel(s), got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Input batch is empty")]
    EmptyBatch,

    #[error("Shape mismatch: a {height}x{width} input flattens to {actual} features \
             but the first fully-connected layer expects {expected}")]
    FeatureMismatch {
        expected: usize,
        actual:   usize,
        height:   usize,
        width:    usize,
    },
}
