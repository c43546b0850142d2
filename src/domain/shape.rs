// ============================================================
// Layer 3 - Shape Plan
// ============================================================
// Computes the tensor shape after every stage of the conv
// stack for a given input size, so the flattened feature
// count can be derived instead of hard-coded.
//
//   input          [1,  H,  W ]
//   conv1 (5x5)    [10, H-4, W-4]
//   pool  (2x2)    [10, ⌊(H-4)/2⌋, ...]
//   conv2 (5x5)    [20, h1-4, w1-4]
//   pool  (2x2)    [20, ⌊(h1-4)/2⌋, ...]
//   flatten        20 * h2 * w2
//
// Convolutions use stride 1 and no padding; pooling uses a
// 2x2 window with stride 2 and floors odd sizes.

use serde::Serialize;

use crate::domain::error::ModelError;

pub const INPUT_CHANNELS: usize = 1;
pub const CONV1_CHANNELS: usize = 10;
pub const CONV2_CHANNELS: usize = 20;
pub const KERNEL_SIZE:    usize = 5;
pub const POOL_SIZE:      usize = 2;

/// Product of every dimension after the first (batch) one.
///
/// # Panics
/// If `dims` is empty: a rank-0 tensor has no batch dimension to skip.
pub fn num_flat_features(dims: &[usize]) -> usize {
    assert!(!dims.is_empty(), "num_flat_features needs at least one dimension");
    dims[1..].iter().product()
}

/// Spatial size after a valid (unpadded, stride 1) convolution.
pub fn conv_output(size: usize, kernel: usize) -> Option<usize> {
    size.checked_sub(kernel - 1).filter(|&s| s > 0)
}

/// Spatial size after non-overlapping max pooling.
pub fn pool_output(size: usize, window: usize) -> Option<usize> {
    Some(size / window).filter(|&s| s > 0)
}

/// `[channels, height, width]` of one sample at one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageShape {
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
}

impl StageShape {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self { channels, height, width }
    }

    /// Element count, or `None` if it does not fit in a `usize`.
    pub fn numel(&self) -> Option<usize> {
        self.channels.checked_mul(self.height)?.checked_mul(self.width)
    }

    pub fn dims(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapePlan {
    pub input: StageShape,
    pub conv1: StageShape,
    pub pool1: StageShape,
    pub conv2: StageShape,
    pub pool2: StageShape,
}

impl ShapePlan {
    pub fn for_input(height: usize, width: usize) -> Result<Self, ModelError> {
        let too_small = |stage| ModelError::InputTooSmall { height, width, stage };

        let input = StageShape::new(INPUT_CHANNELS, height, width);
        let conv1 = Self::conv_stage(input, CONV1_CHANNELS).ok_or_else(|| too_small("conv1"))?;
        let pool1 = Self::pool_stage(conv1).ok_or_else(|| too_small("pool1"))?;
        let conv2 = Self::conv_stage(pool1, CONV2_CHANNELS).ok_or_else(|| too_small("conv2"))?;
        let pool2 = Self::pool_stage(conv2).ok_or_else(|| too_small("pool2"))?;

        let plan = Self { input, conv1, pool1, conv2, pool2 };
        if plan.stages().iter().any(|(_, stage)| stage.numel().is_none()) {
            return Err(ModelError::InputTooLarge { height, width });
        }
        Ok(plan)
    }

    /// Length of the per-sample feature vector fed to the first
    /// fully-connected layer.
    pub fn flat_features(&self) -> usize {
        // for_input already rejected plans whose stages overflow
        num_flat_features(&[1, self.pool2.channels, self.pool2.height, self.pool2.width])
    }

    /// Element count of a `[batch, 1, height, width]` input batch.
    pub fn batch_numel(&self, batch: usize) -> Result<usize, ModelError> {
        self.input
            .numel()
            .and_then(|n| n.checked_mul(batch))
            .ok_or(ModelError::BatchTooLarge { batch, height: self.input.height, width: self.input.width })
    }

    /// Stages in forward order, labelled.
    pub fn stages(&self) -> [(&'static str, StageShape); 5] {
        [
            ("input", self.input),
            ("conv1", self.conv1),
            ("pool1", self.pool1),
            ("conv2", self.conv2),
            ("pool2", self.pool2),
        ]
    }

    fn conv_stage(prev: StageShape, channels: usize) -> Option<StageShape> {
        Some(StageShape::new(
            channels,
            conv_output(prev.height, KERNEL_SIZE)?,
            conv_output(prev.width,  KERNEL_SIZE)?,
        ))
    }

    fn pool_stage(prev: StageShape) -> Option<StageShape> {
        Some(StageShape::new(
            prev.channels,
            pool_output(prev.height, POOL_SIZE)?,
            pool_output(prev.width,  POOL_SIZE)?,
        ))
    }
}
