use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("generator not configured: {0}")]
    NotConfigured(String),

    #[error("invalid prompt: {0}")]
    InvalidInput(String),

    #[error("generation failed: {0}")]
    GenerationFailed(String),
}
