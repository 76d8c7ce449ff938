use zeroize::Zeroize;

/// Accumulated final speech for one recording cycle.
/// Spoken content is sensitive, so the buffer is zeroed on clear and drop.
#[derive(Debug, Default, Zeroize)]
#[zeroize(drop)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized segment.
    ///
    /// Segments are trimmed individually and joined with a single space.
    /// Whitespace-only segments are dropped.
    pub fn push_final_segment(&mut self, segment: &str) {
        let segment = segment.trim();
        if segment.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(segment);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clear the transcript (contents are zeroed first).
    pub fn clear(&mut self) {
        self.text.zeroize();
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_joined_with_single_space() {
        let mut transcript = Transcript::new();
        transcript.push_final_segment("hello");
        transcript.push_final_segment("world");
        assert_eq!(transcript.as_str(), "hello world");
    }

    #[test]
    fn test_segments_trimmed_before_join() {
        let mut transcript = Transcript::new();
        transcript.push_final_segment("  hello ");
        transcript.push_final_segment(" world  ");
        assert_eq!(transcript.as_str(), "hello world");
    }

    #[test]
    fn test_whitespace_only_segments_dropped() {
        let mut transcript = Transcript::new();
        transcript.push_final_segment("   ");
        assert!(transcript.is_empty());
        transcript.push_final_segment("hello");
        transcript.push_final_segment(" \t ");
        assert_eq!(transcript.as_str(), "hello");
    }

    #[test]
    fn test_clear_resets() {
        let mut transcript = Transcript::new();
        transcript.push_final_segment("hello");
        transcript.clear();
        assert!(transcript.is_empty());
        transcript.push_final_segment("again");
        assert_eq!(transcript.as_str(), "again");
    }
}
