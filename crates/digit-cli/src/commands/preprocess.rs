//! Preprocess mode - show the tensor the model would receive

use anyhow::{Context as _, Result};
use clap::Args;
use digit_core::{load_image, preprocess, INPUT_SIZE};
use serde_json::json;
use std::path::PathBuf;

#[derive(Args)]
pub struct PreprocessCommand {
    /// Input image file
    #[arg(value_name = "IMAGE")]
    input: PathBuf,

    /// Invert polarity (dark ink on light paper)
    #[arg(long)]
    invert: bool,

    /// Print the tensor as JSON instead of ASCII art
    #[arg(long)]
    json: bool,
}

impl PreprocessCommand {
    pub fn execute(self) -> Result<()> {
        let image = load_image(&self.input)
            .with_context(|| format!("Failed to load {}", self.input.display()))?;
        let tensor = preprocess(&image, self.invert);

        if self.json {
            let out = json!({
                "source_width": image.width(),
                "source_height": image.height(),
                "size": INPUT_SIZE,
                "invert": self.invert,
                "values": tensor.to_vec(),
            });
            println!("{}", serde_json::to_string(&out)?);
        } else {
            println!(
                "{} ({}x{} -> {}x{}, invert={}, mean={:.3})",
                self.input.display(),
                image.width(),
                image.height(),
                INPUT_SIZE,
                INPUT_SIZE,
                self.invert,
                tensor.mean()
            );
            print!("{}", tensor.to_ascii());
        }
        Ok(())
    }
}
