// ============================================================
// Layer 2 - Model Options
// ============================================================
// Resolution order:
//   1. start from the config file if one is given, else defaults
//   2. apply every explicit override
//   3. if an input size is known and flat_features was not given
//      explicitly, derive flat_features from the shape plan
//   4. validate

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::shape::ShapePlan;
use crate::infra::config_store::ConfigStore;
use crate::ml::model::ConvNetConfig;

#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    pub config_path:   Option<PathBuf>,
    pub n_classes:     Option<usize>,
    pub flat_features: Option<usize>,
    pub hidden:        Option<usize>,
    pub conv_dropout:  Option<f64>,
    pub fc_dropout:    Option<f64>,
    /// (height, width) of the input images
    pub input_size:    Option<(usize, usize)>,
}

/// A validated configuration, with the shape plan when the input
/// size is known.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    pub config: ConvNetConfig,
    pub plan:   Option<ShapePlan>,
}

impl ModelOptions {
    pub fn resolve(&self) -> Result<ResolvedModel> {
        let mut config = match &self.config_path {
            Some(path) => ConfigStore::new(path).load()?,
            None       => ConvNetConfig::new(),
        };

        if let Some(n) = self.n_classes     { config.n_classes = n; }
        if let Some(h) = self.hidden        { config.features.hidden = h; }
        if let Some(p) = self.conv_dropout  { config.conv_dropout = p; }
        if let Some(p) = self.fc_dropout    { config.fc_dropout = p; }
        if let Some(f) = self.flat_features { config.features.flat_features = f; }

        let plan = match self.input_size {
            Some((height, width)) => Some(ShapePlan::for_input(height, width)?),
            None => None,
        };

        if let Some(plan) = &plan {
            let derived = plan.flat_features();
            if self.flat_features.is_none() {
                config.features.flat_features = derived;
                tracing::info!(
                    "Derived flat_features={} from {}x{} input",
                    derived, plan.input.height, plan.input.width,
                );
            } else if derived != config.features.flat_features {
                tracing::warn!(
                    "flat_features={} does not match the {} features a {}x{} input produces",
                    config.features.flat_features, derived, plan.input.height, plan.input.width,
                );
            }
        }

        config.validate()?;
        Ok(ResolvedModel { config, plan })
    }
}
