//! Decode mode - turn a raw score list into a prediction without a model

use crate::parser::parse_scores;
use anyhow::Result;
use clap::Args;
use digit_core::{decode_with_scores, ConfidenceGate, ModelOutputType, DEFAULT_CONFIDENCE_THRESHOLD};
use serde_json::json;

#[derive(Args)]
pub struct DecodeCommand {
    /// Scores, comma or space separated, e.g. "0,0,255" or "[0.9, 0.1]"
    #[arg(value_name = "SCORES", allow_hyphen_values = true)]
    scores: String,

    /// Score layout: quantized (0-255 bytes) or float
    #[arg(long, default_value_t = ModelOutputType::Float)]
    output_type: ModelOutputType,

    /// Confidence threshold in [0, 1]
    #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    threshold: f32,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl DecodeCommand {
    pub fn execute(self) -> Result<()> {
        let raw = parse_scores(&self.scores, self.output_type)?;
        let gate = ConfidenceGate::new(self.threshold)?;
        let prediction = decode_with_scores(&raw, true);
        let verdict = gate.evaluate(&prediction);

        if self.json {
            let out = json!({
                "prediction": prediction,
                "verdict": verdict,
            });
            println!("{}", serde_json::to_string(&out)?);
        } else {
            match prediction.class_index {
                Some(index) => println!(
                    "class {} score {:.3} -> {}",
                    index, prediction.confidence, verdict
                ),
                None => println!("no scores -> {verdict}"),
            }
        }
        Ok(())
    }
}
