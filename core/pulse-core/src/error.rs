//! Error types for pulse-core operations.
//!
//! Delivery failures are deliberately absent: the notifier gateway converts
//! every transport fault into an outcome value instead of an error, so a
//! missed desktop notification can never fail a hook invocation.

#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl PulseError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PulseError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        PulseError::Json {
            context: context.into(),
            source,
        }
    }

    pub fn storage(context: impl Into<String>, source: rusqlite::Error) -> Self {
        PulseError::Storage {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using PulseError.
pub type Result<T> = std::result::Result<T, PulseError>;
