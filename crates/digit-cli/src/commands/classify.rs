//! Classify mode - run the full pipeline over image files
//!
//! The model is loaded once and reused for every input.

use anyhow::{Context as _, Result};
use clap::Args;
use digit_core::{load_image, Classification, ClassifierConfig, DigitClassifier, ModelOutputType};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

#[derive(Args)]
pub struct ClassifyCommand {
    /// Input image files
    #[arg(value_name = "IMAGE", required = true)]
    inputs: Vec<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ONNX model path (overrides config)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Model output layout: quantized or float (overrides config)
    #[arg(long)]
    output_type: Option<ModelOutputType>,

    /// Invert polarity (dark ink on light paper)
    #[arg(long, conflicts_with = "no_invert")]
    invert: bool,

    /// Do not invert polarity, even if the config asks for it
    #[arg(long)]
    no_invert: bool,

    /// Confidence threshold in [0, 1] (overrides config)
    #[arg(short, long)]
    threshold: Option<f32>,

    /// ONNX intra-op threads (overrides config)
    #[arg(long)]
    threads: Option<usize>,

    /// Include per-class scores in the output
    #[arg(long)]
    scores: bool,

    /// Print one JSON object per image
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FileResult<'a> {
    path: &'a Path,
    #[serde(flatten)]
    classification: &'a Classification,
}

impl ClassifyCommand {
    pub fn execute(self) -> Result<()> {
        let config = self.build_config()?;
        let start = Instant::now();
        let classifier = DigitClassifier::from_config(config).context("Failed to load model")?;
        info!(
            "Model ready in {:.3}s (threshold {:.2})",
            start.elapsed().as_secs_f64(),
            classifier.gate().threshold()
        );

        let mut failures = 0usize;
        for path in &self.inputs {
            match Self::classify_file(&classifier, path) {
                Ok(classification) => self.report(path, &classification)?,
                Err(e) => {
                    error!("{}: {:#}", path.display(), e);
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            anyhow::bail!("{} of {} images failed", failures, self.inputs.len());
        }
        Ok(())
    }

    fn build_config(&self) -> Result<ClassifierConfig> {
        let mut config = match &self.config {
            Some(path) => ClassifierConfig::from_yaml(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ClassifierConfig::default(),
        };

        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(output_type) = self.output_type {
            config.output_type = output_type;
        }
        if self.invert {
            config.invert_polarity = true;
        }
        if self.no_invert {
            config.invert_polarity = false;
        }
        if let Some(threshold) = self.threshold {
            config.confidence_threshold = threshold;
        }
        if self.threads.is_some() {
            config.num_threads = self.threads;
        }
        if self.scores {
            config.include_scores = true;
        }

        config.validate()?;
        Ok(config)
    }

    fn classify_file(classifier: &DigitClassifier, path: &Path) -> Result<Classification> {
        let image = load_image(path)?;
        let classification = classifier.classify(&image)?;
        Ok(classification)
    }

    fn report(&self, path: &Path, classification: &Classification) -> Result<()> {
        if self.json {
            let line = serde_json::to_string(&FileResult {
                path,
                classification,
            })?;
            println!("{line}");
        } else {
            println!("{}: {}", path.display(), classification.verdict);
            if let Some(scores) = &classification.prediction.scores {
                let formatted: Vec<String> = scores.iter().map(|s| format!("{s:.3}")).collect();
                println!("  scores: [{}]", formatted.join(", "));
            }
        }
        Ok(())
    }
}
