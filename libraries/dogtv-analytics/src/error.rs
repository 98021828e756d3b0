//! Error types for analytics export

use thiserror::Error;

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while exporting analytics
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Snapshot could not be serialized
    #[error("Failed to serialize statistics: {0}")]
    Serialization(#[from] serde_json::Error),
}
