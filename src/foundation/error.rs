/// Convenience result type used across belleroom.
pub type BelleResult<T> = Result<T, BelleError>;

/// Top-level error taxonomy used by the library APIs.
#[derive(thiserror::Error, Debug)]
pub enum BelleError {
    /// Invalid user-provided configuration or storyboard data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Layer extraction tools failed to run or reported failure.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The video encoder failed to run or reported failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing storyboards.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BelleError {
    /// Build a [`BelleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BelleError::Extraction`] value.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Build a [`BelleError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BelleError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for BelleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
