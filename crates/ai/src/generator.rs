use crate::result::AiError;

/// A text-completion backend.
///
/// Implementations live outside the domain (a hosted model client, a local
/// model, a canned stub in tests). Nothing in this workspace ships a network
/// client.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> Result<String, AiError> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, AiError> {
        (**self).generate(prompt)
    }
}

/// Run `prompt` through an optional generator, mapping each outcome to text.
pub(crate) fn complete(
    generator: Option<&dyn TextGenerator>,
    prompt: &str,
    fallbacks: &Fallbacks,
) -> String {
    let Some(generator) = generator else {
        return fallbacks.not_configured.to_string();
    };
    match generator.generate(prompt) {
        Ok(text) if text.trim().is_empty() => fallbacks.empty.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(err) => {
            tracing::error!(error = %err, "text generation failed");
            fallbacks.failed.to_string()
        }
    }
}

pub(crate) struct Fallbacks {
    pub not_configured: &'static str,
    pub failed: &'static str,
    pub empty: &'static str,
}
