/// Convenience result type used across lindenwarp.
pub type LindenwarpResult<T> = Result<T, LindenwarpError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum LindenwarpError {
    /// Invalid recipe, grammar, or canvas parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The source image could not be read or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// The output image could not be encoded or written.
    #[error("image save error: {0}")]
    ImageSave(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LindenwarpError {
    /// Build a [`LindenwarpError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`LindenwarpError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`LindenwarpError::ImageSave`] value.
    pub fn image_save(msg: impl Into<String>) -> Self {
        Self::ImageSave(msg.into())
    }
}
