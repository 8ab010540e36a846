//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors surfaced by the editor facade.
///
/// Operations that find nothing to act on (an empty selection, a crop on a
/// text object) are not errors; they return early without touching the scene.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The snapshot could not be parsed.
    #[error("Invalid scene snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The snapshot parsed but does not describe a usable scene.
    #[error("Malformed scene: {0}")]
    MalformedScene(String),

    /// The scene has no workspace to measure against.
    #[error("Workspace is missing from the scene")]
    MissingWorkspace,

    /// A numeric or textual argument was rejected.
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// An external image load failed.
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// The host rasterizer failed.
    #[error("Export failed: {0}")]
    Export(String),
}

impl EditorError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EditorError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Reject NaN and infinities.
pub(crate) fn require_finite(field: &'static str, value: f64) -> EditorResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditorError::invalid(field, format!("{value} is not a finite number")))
    }
}

/// Reject non-finite and negative values.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> EditorResult<f64> {
    let value = require_finite(field, value)?;
    if value < 0.0 {
        return Err(EditorError::invalid(field, format!("{value} is negative")));
    }
    Ok(value)
}

/// Reject non-finite, zero and negative values.
pub(crate) fn require_positive(field: &'static str, value: f64) -> EditorResult<f64> {
    let value = require_finite(field, value)?;
    if value <= 0.0 {
        return Err(EditorError::invalid(field, format!("{value} must be positive")));
    }
    Ok(value)
}
