// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and their flags:
//   summary     - shape plan and parameter counts
//   forward     - one forward pass on a synthetic batch
//   init-config - write the resolved configuration as JSON

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::{forward_use_case::ForwardRequest, model_options::ModelOptions};
use crate::domain::mode::ForwardMode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the per-stage shapes and per-layer parameter counts
    Summary(SummaryArgs),

    /// Run one forward pass on a seeded synthetic batch
    Forward(ForwardArgs),

    /// Write the resolved model configuration to a JSON file
    InitConfig(InitConfigArgs),
}

/// Flags shared by every subcommand that builds a model.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// JSON model configuration to start from
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of output classes
    #[arg(long)]
    pub n_classes: Option<usize>,

    /// Input size of the first fully-connected layer.
    /// Derived from --height/--width when omitted
    #[arg(long)]
    pub flat_features: Option<usize>,

    /// Hidden dimension between the two fully-connected layers
    #[arg(long)]
    pub hidden: Option<usize>,

    /// Drop probability of the channel dropout after conv2
    #[arg(long)]
    pub conv_dropout: Option<f64>,

    /// Drop probability of the dropout after fc1
    #[arg(long)]
    pub fc_dropout: Option<f64>,

    /// Input image height in pixels
    #[arg(long, requires = "width")]
    pub height: Option<usize>,

    /// Input image width in pixels
    #[arg(long, requires = "height")]
    pub width: Option<usize>,
}

/// The application layer never sees clap types.
impl From<ModelArgs> for ModelOptions {
    fn from(a: ModelArgs) -> Self {
        ModelOptions {
            config_path:   a.config,
            n_classes:     a.n_classes,
            flat_features: a.flat_features,
            hidden:        a.hidden,
            conv_dropout:  a.conv_dropout,
            fc_dropout:    a.fc_dropout,
            input_size:    a.height.zip(a.width),
        }
    }
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ForwardArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Number of synthetic samples in the batch
    #[arg(long, default_value_t = 4)]
    pub batch_size: usize,

    /// Forward mode: dropout is only active in `train`
    #[arg(long, value_enum, default_value = "eval")]
    pub mode: ModeArg,

    /// Seed for the weights, the dropout masks and the synthetic batch
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<&ForwardArgs> for ForwardRequest {
    fn from(a: &ForwardArgs) -> Self {
        ForwardRequest {
            batch_size: a.batch_size,
            mode:       a.mode.into(),
            seed:       a.seed,
        }
    }
}

/// `--mode` values, mapped onto the domain `ForwardMode`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Train,
    Eval,
}

impl From<ModeArg> for ForwardMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Train => ForwardMode::Train,
            ModeArg::Eval  => ForwardMode::Eval,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Where to write the configuration
    #[arg(long, default_value = "convnet.json")]
    pub out: PathBuf,
}
