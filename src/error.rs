// src/error.rs - Error type shared by every stage of the mesh build

use thiserror::Error;

pub type MeshResult<T> = Result<T, MeshError>;

#[derive(Debug, Error)]
pub enum MeshError {
    /// A configuration field failed validation.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// No piecewise segment covers the requested position.
    #[error("no organic-thickness segment covers x = {x_m} m")]
    UncoveredPosition { x_m: f64 },

    /// The telescoping loop did not reach its stop condition.
    #[error("layer schedule did not terminate after {iterations} iterations (dz = {dz_m} m)")]
    ScheduleDiverged { iterations: usize, dz_m: f64 },

    /// Two sequences that must agree in length do not.
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// The external meshing library reported a failure.
    #[error("meshing backend failed: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MeshError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        MeshError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
