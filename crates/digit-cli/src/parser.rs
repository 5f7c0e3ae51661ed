//! Score list parser for the `decode` command
//!
//! Accepts comma and/or whitespace separated values, optionally wrapped in
//! brackets: `"0,0,255"`, `"[0.9, 0.01, 0.09]"`, `"12 240 3"`.

use digit_core::{ModelOutputType, RawOutput};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Mismatched brackets in: {input}")]
    MismatchedBrackets { input: String },

    #[error("Invalid score '{value}' at position {position}: expected {expected}")]
    InvalidScore {
        position: usize,
        value: String,
        expected: &'static str,
    },
}

/// Parse a score list into raw output of the given layout.
///
/// An empty list (`""` or `"[]"`) yields an empty output.
pub fn parse_scores(input: &str, output_type: ModelOutputType) -> Result<RawOutput, ParseError> {
    let body = strip_brackets(input.trim())?;
    let tokens: Vec<&str> = body
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    match output_type {
        ModelOutputType::Quantized => {
            let mut bytes = Vec::with_capacity(tokens.len());
            for (position, token) in tokens.iter().enumerate() {
                let value = token.parse::<u8>().map_err(|_| ParseError::InvalidScore {
                    position,
                    value: token.to_string(),
                    expected: "an integer in 0..=255",
                })?;
                bytes.push(value);
            }
            Ok(RawOutput::Quantized(bytes))
        }
        ModelOutputType::Float => {
            let mut values = Vec::with_capacity(tokens.len());
            for (position, token) in tokens.iter().enumerate() {
                let value = token
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ParseError::InvalidScore {
                        position,
                        value: token.to_string(),
                        expected: "a finite number",
                    })?;
                values.push(value);
            }
            Ok(RawOutput::Float(values))
        }
    }
}

fn strip_brackets(input: &str) -> Result<&str, ParseError> {
    let opens = input.starts_with('[');
    let closes = input.ends_with(']');
    let inner = match (opens, closes) {
        (true, true) if input.len() >= 2 => &input[1..input.len() - 1],
        (false, false) => input,
        _ => {
            return Err(ParseError::MismatchedBrackets {
                input: input.to_string(),
            })
        }
    };

    if inner.contains('[') || inner.contains(']') {
        return Err(ParseError::MismatchedBrackets {
            input: input.to_string(),
        });
    }
    Ok(inner)
}
