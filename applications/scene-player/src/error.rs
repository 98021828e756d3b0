/// Scene player error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Settings(#[from] dogtv_core::ConfigError),

    #[error("Invalid engine configuration: {0}")]
    Engine(String),
}
