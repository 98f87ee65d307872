//! Error types for the Hiro assistant core.

use uuid::Uuid;

use crate::chat::state::WidgetState;

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by inbound widget operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session has been unmounted")]
    Unmounted,

    #[error("Cannot transition widget from {from} to {to}")]
    InvalidTransition { from: WidgetState, to: WidgetState },

    #[error("Message not found: {0}")]
    UnknownMessage(Uuid),

    #[error("Widget is {state}; voice input needs it open")]
    NotOpen { state: WidgetState },
}

/// Speech recognition errors.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("No speech detected")]
    NoSpeech,
}

/// Settings persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
