//! Digit Classify CLI - handwritten digit recognition from images
//!
//! Command-line front end for the digit classification pipeline.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod parser;

use commands::classify::ClassifyCommand;
use commands::decode::DecodeCommand;
use commands::preprocess::PreprocessCommand;

#[derive(Parser)]
#[command(
    name = "digit-classify",
    version,
    about = "Classify handwritten digits with a pre-trained MNIST-style model",
    long_about = "Classify photos of handwritten digits (0-9).\n\n\
                  Images of any size are resized to 28x28, reduced to grayscale,\n\
                  optionally inverted, contrast-stretched and fed to an ONNX model.\n\
                  Predictions at or below the confidence threshold are reported as unknown.",
    after_help = "EXAMPLES:\n  \
                  # Classify a photo of dark ink on white paper\n  \
                  digit-classify classify --model models/mnist.onnx --invert photo.jpg\n\n  \
                  # Quantized model, JSON output\n  \
                  digit-classify classify --output-type quantized --json *.png\n\n  \
                  # Inspect what the model will see\n  \
                  digit-classify preprocess --invert photo.jpg\n\n  \
                  # Decode raw scores without a model\n  \
                  digit-classify decode --output-type quantized 0,0,0,0,0,0,0,255,0,0"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one or more images
    Classify(ClassifyCommand),

    /// Show the 28x28 tensor produced for an image
    Preprocess(PreprocessCommand),

    /// Decode a raw score list and apply the confidence gate
    Decode(DecodeCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Classify(cmd) => cmd.execute(),
        Commands::Preprocess(cmd) => cmd.execute(),
        Commands::Decode(cmd) => cmd.execute(),
    }
}
