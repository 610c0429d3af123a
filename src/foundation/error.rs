/// Convenience result type used across Socialflow.
pub type SocialflowResult<T> = Result<T, SocialflowError>;

/// Top-level error taxonomy used by editor, render, and export APIs.
///
/// None of these are fatal to an editor session: callers surface or log them and keep the
/// previous document state.
#[derive(thiserror::Error, Debug)]
pub enum SocialflowError {
    /// Invalid user-provided document, config, or request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The content-generation collaborator failed or returned unusable output.
    #[error("generation error: {0}")]
    Generation(String),

    /// Rasterizing or encoding a slide failed; the whole export batch is discarded.
    #[error("export error: {0}")]
    Export(String),

    /// Stored editor state could not be read or written.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SocialflowError {
    /// Build a [`SocialflowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SocialflowError::Generation`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build a [`SocialflowError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`SocialflowError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`SocialflowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for SocialflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
