// ============================================================
// Layer 5 - Dropout
// ============================================================
// Two dropout flavours used by the classifier:
//
//   ChannelDropout - zeroes whole feature maps of a
//                    [batch, channels, h, w] tensor
//   FeatureDropout - zeroes individual activations
//
// Both keep the expected activation by scaling the survivors
// by 1 / (1 - prob), and both are the identity in Eval mode.
//
// Sampling a mask and applying it are separate steps so the
// model can draw every mask from the backend RNG before any
// layer runs: `Backend::seed` then fixes a whole training pass.
// Unlike burn::nn::Dropout the mode is explicit, so Train works
// on non-autodiff backends too.

use burn::{prelude::*, tensor::Distribution};

use crate::domain::mode::ForwardMode;

/// Channel-wise dropout over 4-D feature maps.
#[derive(Module, Clone, Debug)]
pub struct ChannelDropout {
    pub prob: f64,
}

impl ChannelDropout {
    pub fn new(prob: f64) -> Self {
        Self { prob }
    }

    /// Keep-mask already scaled by 1 / (1 - prob), or `None` when the
    /// layer is the identity for this mode.
    pub fn sample_mask<B: Backend>(
        &self,
        dims:   [usize; 4],
        mode:   ForwardMode,
        device: &B::Device,
    ) -> Option<Tensor<B, 4>> {
        if !mode.is_training() || self.prob == 0.0 {
            return None;
        }

        let [batch, channels, height, width] = dims;

        // One Bernoulli draw per (sample, channel), then spread over the map
        let keep = Tensor::<B, 4>::random(
            [batch, channels, 1, 1],
            Distribution::Bernoulli(1.0 - self.prob),
            device,
        )
        .repeat_dim(2, height)
        .repeat_dim(3, width);

        Some(keep.div_scalar(1.0 - self.prob))
    }

    /// `input`: [batch, channels, height, width] → same shape
    pub fn forward<B: Backend>(&self, input: Tensor<B, 4>, mode: ForwardMode) -> Tensor<B, 4> {
        let mask = self.sample_mask(input.dims(), mode, &input.device());
        apply_mask(input, mask)
    }
}

/// Element-wise dropout over a tensor of any rank.
#[derive(Module, Clone, Debug)]
pub struct FeatureDropout {
    pub prob: f64,
}

impl FeatureDropout {
    pub fn new(prob: f64) -> Self {
        Self { prob }
    }

    pub fn sample_mask<B: Backend, const D: usize>(
        &self,
        dims:   [usize; D],
        mode:   ForwardMode,
        device: &B::Device,
    ) -> Option<Tensor<B, D>> {
        if !mode.is_training() || self.prob == 0.0 {
            return None;
        }

        let keep = Tensor::<B, D>::random(dims, Distribution::Bernoulli(1.0 - self.prob), device);
        Some(keep.div_scalar(1.0 - self.prob))
    }

    pub fn forward<B: Backend, const D: usize>(
        &self,
        input: Tensor<B, D>,
        mode:  ForwardMode,
    ) -> Tensor<B, D> {
        let mask = self.sample_mask(input.dims(), mode, &input.device());
        apply_mask(input, mask)
    }
}

/// Multiplies by a mask from `sample_mask`; `None` passes `input` through.
pub fn apply_mask<B: Backend, const D: usize>(
    input: Tensor<B, D>,
    mask:  Option<Tensor<B, D>>,
) -> Tensor<B, D> {
    match mask {
        Some(mask) => input * mask,
        None       => input,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn values<const D: usize>(x: Tensor<TestBackend, D>) -> Vec<f32> {
        x.into_data().iter::<f32>().collect()
    }

    #[test]
    fn test_eval_is_identity() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 4>::random([2, 3, 4, 4], Distribution::Default, &device);

        let channel = ChannelDropout::new(0.5).forward(x.clone(), ForwardMode::Eval);
        let feature = FeatureDropout::new(0.5).forward(x.clone(), ForwardMode::Eval);

        assert_eq!(values(channel), values(x.clone()));
        assert_eq!(values(feature), values(x));
    }

    #[test]
    fn test_zero_prob_train_is_identity() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 2>::random([4, 16], Distribution::Default, &device);
        let y = FeatureDropout::new(0.0).forward(x.clone(), ForwardMode::Train);
        assert_eq!(values(y), values(x));
    }

    #[test]
    fn test_channel_dropout_zeroes_whole_maps() {
        let device = Default::default();
        let (batch, channels, h, w) = (4, 20, 3, 5);
        let x = Tensor::<TestBackend, 4>::ones([batch, channels, h, w], &device);

        let y = values(ChannelDropout::new(0.5).forward(x, ForwardMode::Train));

        // Each map is either all dropped (0) or all kept and rescaled (2)
        for map in y.chunks(h * w) {
            let first = map[0];
            assert!(first == 0.0 || (first - 2.0).abs() < 1e-6, "unexpected value {first}");
            assert!(map.iter().all(|&v| v == first));
        }
    }

    #[test]
    fn test_feature_dropout_values_and_rate() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 2>::ones([8, 1000], &device);

        let y = values(FeatureDropout::new(0.5).forward(x, ForwardMode::Train));

        assert!(y.iter().all(|&v| v == 0.0 || (v - 2.0).abs() < 1e-6));
        let dropped = y.iter().filter(|&&v| v == 0.0).count() as f64 / y.len() as f64;
        // 8000 draws at p=0.5 stay well inside 0.4..0.6
        assert!((0.4..0.6).contains(&dropped), "dropped fraction {dropped}");
    }

    #[test]
    fn test_no_mask_outside_training() {
        let device = Default::default();
        let channel = ChannelDropout::new(0.5);
        let feature = FeatureDropout::new(0.0);

        assert!(channel.sample_mask::<TestBackend>([2, 3, 4, 4], ForwardMode::Eval, &device).is_none());
        assert!(feature.sample_mask::<TestBackend, 2>([2, 8], ForwardMode::Train, &device).is_none());
    }

    #[test]
    fn test_sampled_mask_is_scaled_and_shaped() {
        let device = Default::default();
        let mask = FeatureDropout::new(0.75)
            .sample_mask::<TestBackend, 2>([4, 50], ForwardMode::Train, &device)
            .unwrap();

        assert_eq!(mask.dims(), [4, 50]);
        // Survivors carry 1 / (1 - 0.75) = 4
        assert!(values(mask).iter().all(|&v| v == 0.0 || (v - 4.0).abs() < 1e-6));
    }
}
