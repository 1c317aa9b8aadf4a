//! Error types for search-change-tracking

use search_tracking::TrackingError;
use std::fmt;
use thiserror::Error;

/// Change tracking error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dependency compilation or configuration errors
    Tracking,
    /// Queue sink refused or failed to store items
    Queue,
    /// Malformed change event
    InvalidEvent,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Tracking => "tracking",
            ErrorKind::Queue => "queue",
            ErrorKind::InvalidEvent => "invalid_event",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Change tracking error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct ChangeTrackingError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl ChangeTrackingError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn queue(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Queue, message)
    }

    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidEvent, message)
    }
}

impl From<TrackingError> for ChangeTrackingError {
    fn from(err: TrackingError) -> Self {
        ChangeTrackingError::new(ErrorKind::Tracking, format!("Tracking error: {}", err))
            .with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ChangeTrackingError>;
