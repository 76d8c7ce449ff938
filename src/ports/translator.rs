use async_trait::async_trait;

use crate::domain::DomainError;

/// Port for the networked text-to-Braille translation capability.
#[async_trait]
pub trait BrailleTranslator: Send + Sync {
    /// Translate English text into Grade 1 Braille Unicode.
    ///
    /// Input is a non-empty trimmed transcript; the orchestrator
    /// short-circuits empty input before reaching this call.
    /// The output is trusted verbatim (trimmed); no retry is performed.
    async fn translate(&self, text: &str) -> Result<String, DomainError>;
}
