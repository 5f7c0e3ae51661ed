//! ONNX Runtime session construction
//!
//! Sessions are built once per model with full graph optimization and a
//! bounded intra-op thread pool. The classifier model is tiny, so execution
//! stays on the CPU provider.

use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Environment variable overriding the intra-op thread count
pub const THREADS_ENV_VAR: &str = "DIGIT_CLASSIFY_THREADS";

/// Error type for ONNX operations
#[derive(Debug, thiserror::Error)]
pub enum OnnxError {
    #[error("Failed to create session builder: {0}")]
    SessionBuilderError(String),

    #[error("Failed to load ONNX model from {path}: {error}")]
    ModelLoadError { path: String, error: String },

    #[error("Model file not found: {0}")]
    ModelNotFound(String),
}

impl From<OnnxError> for digit_common::ProcessingError {
    fn from(err: OnnxError) -> Self {
        match err {
            OnnxError::ModelNotFound(path) => Self::ModelNotFound(path),
            OnnxError::ModelLoadError { path, error } => Self::ModelLoad { path, error },
            OnnxError::SessionBuilderError(error) => Self::ModelLoad {
                path: String::new(),
                error,
            },
        }
    }
}

/// Resolve the intra-op thread count.
///
/// Priority: explicit value, then `DIGIT_CLASSIFY_THREADS`, then physical cores.
#[must_use]
pub fn resolve_num_threads(requested: Option<usize>) -> usize {
    requested
        .filter(|&n| n > 0)
        .or_else(|| {
            std::env::var(THREADS_ENV_VAR)
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&n| n > 0)
        })
        .unwrap_or_else(num_cpus::get_physical)
}

/// Create a CPU session for the model at `model_path`
///
/// # Arguments
/// * `model_path` - Path to the ONNX model file
/// * `num_threads` - Intra-op threads; `None` defers to [`resolve_num_threads`]
///
/// # Errors
/// `ModelNotFound` if the file is absent, `ModelLoadError` if the runtime
/// rejects it.
pub fn create_session(model_path: &Path, num_threads: Option<usize>) -> Result<Session, OnnxError> {
    if !model_path.exists() {
        return Err(OnnxError::ModelNotFound(model_path.display().to_string()));
    }

    let num_threads = resolve_num_threads(num_threads);
    let start = Instant::now();

    let session = Session::builder()
        .map_err(|e| OnnxError::SessionBuilderError(e.to_string()))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| OnnxError::SessionBuilderError(e.to_string()))?
        .with_intra_threads(num_threads)
        .map_err(|e| OnnxError::SessionBuilderError(e.to_string()))?
        .with_memory_pattern(true)
        .map_err(|e| OnnxError::SessionBuilderError(e.to_string()))?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .map_err(|e| OnnxError::SessionBuilderError(e.to_string()))?
        .commit_from_file(model_path)
        .map_err(|e| OnnxError::ModelLoadError {
            path: model_path.display().to_string(),
            error: e.to_string(),
        })?;

    debug!(
        "Session created for {} in {:.3}s ({} threads)",
        model_path.display(),
        start.elapsed().as_secs_f64(),
        num_threads
    );

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use digit_common::ProcessingError;

    #[test]
    fn test_model_not_found() {
        let result = create_session(Path::new("nonexistent_model.onnx"), Some(1));
        assert!(matches!(result.unwrap_err(), OnnxError::ModelNotFound(_)));
    }

    #[test]
    fn test_corrupt_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.onnx");
        std::fs::write(&path, b"definitely not a protobuf").unwrap();

        let result = create_session(&path, Some(1));
        assert!(matches!(result.unwrap_err(), OnnxError::ModelLoadError { .. }));
    }

    #[test]
    fn test_explicit_thread_count_wins() {
        assert_eq!(resolve_num_threads(Some(3)), 3);
        assert!(resolve_num_threads(None) > 0);
        assert!(resolve_num_threads(Some(0)) > 0);
    }

    // Only test that sets the variable
    #[test]
    fn test_thread_count_env_override() {
        let physical = num_cpus::get_physical();

        std::env::set_var(THREADS_ENV_VAR, "5");
        assert_eq!(resolve_num_threads(None), 5);
        assert_eq!(resolve_num_threads(Some(2)), 2);
        assert_eq!(resolve_num_threads(Some(0)), 5);

        std::env::set_var(THREADS_ENV_VAR, "0");
        assert_eq!(resolve_num_threads(None), physical);

        std::env::set_var(THREADS_ENV_VAR, "many");
        assert_eq!(resolve_num_threads(None), physical);

        std::env::remove_var(THREADS_ENV_VAR);
        assert_eq!(resolve_num_threads(None), physical);
    }

    #[test]
    fn test_error_display() {
        let err = OnnxError::ModelNotFound("test.onnx".to_string());
        assert_eq!(err.to_string(), "Model file not found: test.onnx");

        let err = OnnxError::ModelLoadError {
            path: "test.onnx".to_string(),
            error: "invalid format".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load ONNX model from test.onnx: invalid format"
        );
    }

    #[test]
    fn test_conversion_to_processing_error() {
        let err: ProcessingError = OnnxError::ModelNotFound("m.onnx".to_string()).into();
        assert!(matches!(err, ProcessingError::ModelNotFound(p) if p == "m.onnx"));
    }
}
