//! Two-stage convolutional classifier with log-softmax output, built on burn.
//!
//! ```text
//! [batch, 1, H, W]
//!   → conv 5x5 (10) → max-pool 2x2 → relu
//!   → conv 5x5 (20) → channel dropout → max-pool 2x2 → relu
//!   → flatten → linear (hidden) → relu → dropout
//!   → linear (classes) → log-softmax
//! [batch, classes]
//! ```
#![recursion_limit = "256"]

pub mod application;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ml;

pub use domain::{error::ModelError, mode::ForwardMode, shape::ShapePlan};
pub use ml::model::{ConvNet, ConvNetConfig, FeatureDims};
