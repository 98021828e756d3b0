/// Audio pipeline errors
use dogtv_core::{AudioFormat, ConfigError};
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio pipeline error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// A stage could not be prepared; the pipeline refuses to process
    #[error("Audio engine failed: {0}")]
    EngineFailed(String),

    /// Buffer format differs from the format the pipeline was prepared for
    #[error("Format mismatch: pipeline prepared for {expected}, got {actual}")]
    FormatMismatch {
        expected: AudioFormat,
        actual: AudioFormat,
    },

    /// Empty buffer or a sample count that is not a whole number of frames
    #[error("Invalid audio buffer: {0}")]
    InvalidBuffer(String),

    /// Stage order that is not a permutation of all stages
    #[error("Invalid stage order: {0}")]
    InvalidStageOrder(String),

    /// Control queue to the audio thread is full
    #[error("Pipeline control queue is full")]
    ControlQueueFull,

    /// The pipeline owning the control queue has been dropped
    #[error("Pipeline has been dropped")]
    PipelineClosed,

    /// Settings validation error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AudioError {
    /// Create an engine failure error
    pub fn engine_failed(msg: impl Into<String>) -> Self {
        Self::EngineFailed(msg.into())
    }

    /// Create an invalid buffer error
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }
}
