// ============================================================
// Layer 2 - ForwardUseCase
// ============================================================
// Runs one forward pass on a synthetic batch so the shape
// contract can be checked end to end without any dataset:
//
//   Step 1: seed the backend RNG (weights + dropout masks)
//   Step 2: build the model
//   Step 3: fill [batch, 1, h, w] with uniform values from a
//           seeded StdRng
//   Step 4: forward in the requested mode
//   Step 5: read back log-probabilities and predictions

use anyhow::{bail, Result};
use burn::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::application::model_options::ResolvedModel;
use crate::domain::{mode::ForwardMode, shape::INPUT_CHANNELS};
use crate::ml::{batch, model::ConvNet};

/// Largest synthetic batch, in pixels (1 GiB of f32).
pub const MAX_BATCH_ELEMENTS: usize = 1 << 28;

#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub batch_size: usize,
    pub mode:       ForwardMode,
    pub seed:       u64,
}

impl Default for ForwardRequest {
    fn default() -> Self {
        Self { batch_size: 4, mode: ForwardMode::Eval, seed: 42 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForwardReport {
    pub mode:        ForwardMode,
    pub output_dims: [usize; 2],
    /// One row of log-probabilities per sample
    pub log_probs:   Vec<Vec<f32>>,
    /// exp(log_probs) summed per row; 1.0 up to rounding
    pub row_mass:    Vec<f32>,
    pub predictions: Vec<usize>,
}

pub struct ForwardUseCase {
    resolved: ResolvedModel,
    request:  ForwardRequest,
}

impl ForwardUseCase {
    pub fn new(resolved: ResolvedModel, request: ForwardRequest) -> Self {
        Self { resolved, request }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<ForwardReport> {
        let Some(plan) = &self.resolved.plan else {
            bail!("a forward pass needs the input size: pass --height and --width");
        };
        let (height, width) = (plan.input.height, plan.input.width);
        let req = &self.request;

        let numel = plan.batch_numel(req.batch_size)?;
        if numel > MAX_BATCH_ELEMENTS {
            bail!(
                "batch of {} {}x{} images has {} pixels, more than the limit of {}",
                req.batch_size, height, width, numel, MAX_BATCH_ELEMENTS,
            );
        }

        // ── Step 1 + 2: seeded model ─────────────────────────────────────────
        B::seed(req.seed);
        let model: ConvNet<B> = self.resolved.config.init(device)?;

        // ── Step 3: synthetic batch ──────────────────────────────────────────
        let shape = [req.batch_size, INPUT_CHANNELS, height, width];
        let mut rng = StdRng::seed_from_u64(req.seed);
        let pixels: Vec<f32> = (0..numel).map(|_| rng.gen::<f32>()).collect();
        let input = batch::images_from_pixels::<B>(pixels, shape, device);

        tracing::info!(
            "Running {} forward pass on {} {}x{} images",
            req.mode, req.batch_size, height, width,
        );

        // ── Step 4: forward ──────────────────────────────────────────────────
        let output = model.forward(input, req.mode)?;
        let output_dims = output.dims();

        // ── Step 5: read back ────────────────────────────────────────────────
        let log_probs = batch::rows(output);
        let row_mass: Vec<f32> = log_probs
            .iter()
            .map(|row| row.iter().map(|v| v.exp()).sum::<f32>())
            .collect();
        let predictions: Vec<usize> = log_probs.iter().map(|row| argmax(row)).collect();

        Ok(ForwardReport { mode: req.mode, output_dims, log_probs, row_mass, predictions })
    }
}

fn argmax(row: &[f32]) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::model_options::ModelOptions;
    use burn::backend::NdArray;

    fn resolved(height: usize, width: usize) -> ResolvedModel {
        ModelOptions { input_size: Some((height, width)), ..Default::default() }
            .resolve()
            .unwrap()
    }

    #[test]
    fn test_reports_batch_by_classes() {
        let report = ForwardUseCase::new(resolved(48, 48), ForwardRequest::default())
            .execute::<NdArray>(&Default::default())
            .unwrap();

        assert_eq!(report.output_dims, [4, 2]);
        assert_eq!(report.log_probs.len(), 4);
        assert_eq!(report.predictions.len(), 4);
        for mass in report.row_mass {
            assert!((mass - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_needs_input_size() {
        let resolved = ModelOptions::default().resolve().unwrap();
        let err = ForwardUseCase::new(resolved, ForwardRequest::default())
            .execute::<NdArray>(&Default::default())
            .unwrap_err();
        assert!(err.to_string().contains("--height"));
    }

    #[test]
    fn test_oversized_batch_is_rejected_before_allocating() {
        let huge = ForwardRequest { batch_size: usize::MAX, ..Default::default() };
        let err = ForwardUseCase::new(resolved(48, 48), huge)
            .execute::<NdArray>(&Default::default())
            .unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");

        let over_limit = ForwardRequest {
            batch_size: MAX_BATCH_ELEMENTS / (48 * 48) + 1,
            ..Default::default()
        };
        let err = ForwardUseCase::new(resolved(48, 48), over_limit)
            .execute::<NdArray>(&Default::default())
            .unwrap_err();
        assert!(err.to_string().contains("limit"), "{err}");
    }

    #[test]
    fn test_argmax_picks_first_maximum() {
        assert_eq!(argmax(&[-2.0, -0.1, -0.1]), 1);
        assert_eq!(argmax(&[-0.5]), 0);
    }
}
