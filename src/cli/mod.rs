// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, dispatches to Layer 2 and prints
// the results. All model work is delegated to the use cases.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ForwardArgs, InitConfigArgs, SummaryArgs};

use crate::application::{
    forward_use_case::{ForwardReport, ForwardRequest, ForwardUseCase},
    model_options::ModelOptions,
    summary_use_case::{ModelSummary, SummaryUseCase},
};
use crate::infra::config_store::ConfigStore;
use crate::ml::backend::{cli_device, CliBackend};

#[derive(Parser, Debug)]
#[command(
    name = "pan17-convnet",
    version,
    about = "Inspect and run a two-stage convolutional log-softmax classifier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Summary(args)    => run_summary(args),
            Commands::Forward(args)    => run_forward(args),
            Commands::InitConfig(args) => run_init_config(args),
        }
    }
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let resolved = ModelOptions::from(args.model).resolve()?;
    let summary  = SummaryUseCase::new(resolved).execute::<CliBackend>(&cli_device())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn run_forward(args: ForwardArgs) -> Result<()> {
    let request  = ForwardRequest::from(&args);
    let resolved = ModelOptions::from(args.model).resolve()?;
    let report   = ForwardUseCase::new(resolved, request).execute::<CliBackend>(&cli_device())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_forward(&report);
    }
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    let resolved = ModelOptions::from(args.model).resolve()?;
    let store    = ConfigStore::new(args.out);
    store.save(&resolved.config)?;

    println!("Wrote model config to {}", store.path().display());
    Ok(())
}

fn print_summary(summary: &ModelSummary) {
    let cfg = &summary.config;
    println!(
        "ConvNet: n_classes={} flat_features={} hidden={} conv_dropout={} fc_dropout={}",
        cfg.n_classes, cfg.features.flat_features, cfg.features.hidden,
        cfg.conv_dropout, cfg.fc_dropout,
    );

    if let Some(plan) = &summary.plan {
        println!("\n{:<8} {:>8} {:>8} {:>8} {:>10}", "stage", "channels", "height", "width", "features");
        for (name, stage) in plan.stages() {
            println!(
                "{:<8} {:>8} {:>8} {:>8} {:>10}",
                name, stage.channels, stage.height, stage.width, stage.numel().unwrap_or_default(),
            );
        }
    }

    println!("\n{:<8} {:>12}", "layer", "params");
    for layer in &summary.layers {
        println!("{:<8} {:>12}", layer.name, layer.params);
    }
    println!("{:<8} {:>12}", "total", summary.total_params);
}

fn print_forward(report: &ForwardReport) {
    println!(
        "mode={} output=[{}, {}]",
        report.mode, report.output_dims[0], report.output_dims[1],
    );
    for (i, row) in report.log_probs.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>9.4}")).collect();
        println!(
            "sample {:>3} | {} | mass={:.6} | class={}",
            i, cells.join(" "), report.row_mass[i], report.predictions[i],
        );
    }
}
