// ============================================================
// Layer 2 - SummaryUseCase
// ============================================================
// Builds the model from a resolved configuration and collects
// what the CLI prints: configuration, per-stage shapes and
// per-layer parameter counts.

use anyhow::Result;
use burn::prelude::*;
use serde::Serialize;

use crate::application::model_options::ResolvedModel;
use crate::domain::shape::ShapePlan;
use crate::ml::model::{ConvNet, ConvNetConfig};

#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub name:   &'static str,
    pub params: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub config:       ConvNetConfig,
    pub plan:         Option<ShapePlan>,
    pub layers:       Vec<LayerSummary>,
    pub total_params: usize,
}

pub struct SummaryUseCase {
    resolved: ResolvedModel,
}

impl SummaryUseCase {
    pub fn new(resolved: ResolvedModel) -> Self {
        Self { resolved }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<ModelSummary> {
        let model: ConvNet<B> = self.resolved.config.init(device)?;

        let layers: Vec<LayerSummary> = model
            .layer_params()
            .into_iter()
            .map(|(name, params)| LayerSummary { name, params })
            .collect();
        let total_params = model.num_params();

        tracing::info!("Model has {} trainable parameters", total_params);

        Ok(ModelSummary {
            config: self.resolved.config.clone(),
            plan:   self.resolved.plan.clone(),
            layers,
            total_params,
        })
    }
}
