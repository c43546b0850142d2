// ============================================================
// Layer 3 - ForwardMode
// ============================================================
// Dropout is the only layer whose behaviour depends on the
// mode: stochastic in Train, identity in Eval. The mode is an
// argument of every forward call, never stored on the model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardMode {
    /// Dropout active
    Train,
    /// Dropout disabled, output is deterministic for fixed weights
    #[default]
    Eval,
}

impl ForwardMode {
    pub fn is_training(self) -> bool {
        matches!(self, ForwardMode::Train)
    }
}

impl std::fmt::Display for ForwardMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForwardMode::Train => write!(f, "train"),
            ForwardMode::Eval  => write!(f, "eval"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_eval() {
        assert_eq!(ForwardMode::default(), ForwardMode::Eval);
        assert!(!ForwardMode::Eval.is_training());
        assert!(ForwardMode::Train.is_training());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ForwardMode::Train).unwrap();
        assert_eq!(json, "\"train\"");
        let back: ForwardMode = serde_json::from_str("\"eval\"").unwrap();
        assert_eq!(back, ForwardMode::Eval);
    }
}
