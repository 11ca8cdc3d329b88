//! Error types for the launcher.

use thiserror::Error;

/// Fatal failures of a launch. Each one aborts the remaining lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Expected a file ending with either {primary} or {secondary}")]
    InvalidSelection { primary: String, secondary: String },

    #[error("Expected to find a file in the same folder ending with {suffix} ({})", expected.display())]
    MissingCounterpart {
        suffix: String,
        expected: std::path::PathBuf,
    },

    #[error("Container engine is not available: {0}")]
    EngineUnavailable(String),

    #[error("Failed to pull image {image}: {message}")]
    ImagePullFailed { image: String, message: String },

    #[error("Failed to launch container: {0}")]
    LaunchFailed(String),

    #[error("Timed out after waiting {0} seconds for the server to load")]
    ReadyTimeout(u64),

    #[error("Failed to stop stale container {id}: {message}")]
    CleanupFailed { id: String, message: String },
}

/// Discriminant of [`LaunchError`], recorded in the lifecycle's error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSelection,
    MissingCounterpart,
    EngineUnavailable,
    ImagePullFailed,
    LaunchFailed,
    ReadyTimeout,
    CleanupFailed,
}

impl LaunchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LaunchError::InvalidSelection { .. } => ErrorKind::InvalidSelection,
            LaunchError::MissingCounterpart { .. } => ErrorKind::MissingCounterpart,
            LaunchError::EngineUnavailable(_) => ErrorKind::EngineUnavailable,
            LaunchError::ImagePullFailed { .. } => ErrorKind::ImagePullFailed,
            LaunchError::LaunchFailed(_) => ErrorKind::LaunchFailed,
            LaunchError::ReadyTimeout(_) => ErrorKind::ReadyTimeout,
            LaunchError::CleanupFailed { .. } => ErrorKind::CleanupFailed,
        }
    }

    /// Short title used for the interactive acknowledgment dialog.
    pub fn title(&self) -> &'static str {
        match self {
            LaunchError::InvalidSelection { .. } => "Invalid selection",
            LaunchError::MissingCounterpart { .. } => "Missing database",
            LaunchError::EngineUnavailable(_) => "Docker unavailable",
            LaunchError::ImagePullFailed { .. } => "Image pull failed",
            LaunchError::LaunchFailed(_) => "Launch failed",
            LaunchError::ReadyTimeout(_) => "Server timed out",
            LaunchError::CleanupFailed { .. } => "Cleanup failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
