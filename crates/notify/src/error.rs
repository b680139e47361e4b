use std::error::Error as StdError;

/// Crate-wide result type for notification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors for notification plumbing.
///
/// Per-channel delivery failures never surface here; they are retried,
/// logged, and recorded in the registry's diagnostic cache instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input identity or payload is invalid.
    #[error("invalid channel input: {message}")]
    InvalidInput { message: String },

    /// The durable channel directory failed.
    #[error("channel directory failure: {context}: {source}")]
    Directory {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// JSON (de)serialization of a stored channel failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn directory(
        context: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Directory {
            context: context.into(),
            source: source.into(),
        }
    }
}
