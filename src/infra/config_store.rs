// ============================================================
// Layer 6 - Config Store
// ============================================================
// Saves and restores ConvNetConfig as JSON.
//
// Example file:
//   {
//     "n_classes": 2,
//     "features": { "flat_features": 4800, "hidden": 400 },
//     "conv_dropout": 0.5,
//     "fc_dropout": 0.5
//   }

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::ml::model::ConvNetConfig;

/// Reads and writes one configuration file.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `cfg` as pretty JSON, creating parent directories as needed.
    pub fn save(&self, cfg: &ConvNetConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;

        tracing::debug!("Saved model config to '{}'", self.path.display());
        Ok(())
    }

    /// Read and validate a configuration.
    pub fn load(&self) -> Result<ConvNetConfig> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read config from '{}'", self.path.display()))?;

        let cfg: ConvNetConfig = serde_json::from_str(&json)
            .with_context(|| format!("Invalid model config in '{}'", self.path.display()))?;
        cfg.validate()?;

        tracing::debug!("Loaded model config from '{}'", self.path.display());
        Ok(cfg)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::FeatureDims;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pan17-convnet-{}-{name}", std::process::id()))
            .join("model.json")
    }

    #[test]
    fn test_save_then_load() {
        let store = ConfigStore::new(scratch_path("roundtrip"));
        let cfg = ConvNetConfig::new()
            .with_n_classes(3)
            .with_features(FeatureDims { flat_features: 1620, hidden: 128 })
            .with_conv_dropout(0.25);

        store.save(&cfg).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.n_classes, 3);
        assert_eq!(loaded.features, FeatureDims { flat_features: 1620, hidden: 128 });
        assert_eq!(loaded.conv_dropout, 0.25);
        assert_eq!(loaded.fc_dropout, 0.5);

        fs::remove_dir_all(store.path().parent().unwrap()).ok();
    }

    #[test]
    fn test_missing_file_names_path() {
        let store = ConfigStore::new(scratch_path("missing"));
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Cannot read config"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let path = scratch_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"n_classes":0,"features":{"flat_features":4800,"hidden":400},"conv_dropout":0.5,"fc_dropout":0.5}"#,
        )
        .unwrap();

        assert!(ConfigStore::new(&path).load().is_err());
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
