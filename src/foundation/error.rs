pub type KinetextResult<T> = Result<T, KinetextError>;

#[derive(thiserror::Error, Debug)]
pub enum KinetextError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// A font request resolved to no file and no fallback produced a face.
    #[error("font not found: {request}")]
    FontNotFound { request: String },

    #[error("texture load failure: {0}")]
    TextureLoad(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KinetextError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn font_not_found(request: impl Into<String>) -> Self {
        Self::FontNotFound {
            request: request.into(),
        }
    }

    pub fn texture_load(msg: impl Into<String>) -> Self {
        Self::TextureLoad(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
