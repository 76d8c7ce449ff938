use serde::{Deserialize, Serialize};

/// Completed translation for one transcript.
/// Immutable once created; replaced wholesale by the next translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// The transcript that was translated.
    pub original: String,
    /// Grade 1 Braille Unicode output from the provider, trimmed.
    pub braille: String,
}

impl TranslationResult {
    /// Result for an empty transcript: no provider call is made.
    pub fn empty() -> Self {
        Self {
            original: String::new(),
            braille: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = TranslationResult::empty();
        assert_eq!(result.original, "");
        assert_eq!(result.braille, "");
    }
}
