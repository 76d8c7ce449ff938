use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::DomainError;

/// A unit of recognized speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSegment {
    /// Recognized text for this segment.
    pub text: String,
    /// True once the provider will not revise this segment further.
    /// Interim segments exist only for live captioning and are discarded.
    pub is_final: bool,
}

impl SpeechSegment {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// Events delivered by a speech session.
#[derive(Debug, Clone)]
pub enum SpeechEvent {
    /// The provider confirmed the session is live.
    SessionStarted,
    /// One batch of recognition results.
    Segments(Vec<SpeechSegment>),
    /// The provider reported a mid-session failure.
    /// Real backends usually follow this with SessionEnded.
    SessionError { message: String },
    /// The session ended, either on request or provider-initiated
    /// (e.g. a silence timeout). Sole authority for the Idle transition.
    SessionEnded,
}

/// Port for the host-supplied speech-to-text capability.
///
/// The capability is injected as `Option<Arc<dyn SpeechRecognizer>>`;
/// absence is reported as Unsupported, never probed by panicking.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Start a speech session. Results arrive via the event stream,
    /// not as a return value.
    async fn begin(&self) -> Result<(), DomainError>;

    /// Request termination. The actual stop is confirmed by a
    /// SessionEnded event, which may arrive after a delay.
    async fn end(&self) -> Result<(), DomainError>;

    /// Subscribe to session events.
    fn subscribe(&self) -> broadcast::Receiver<SpeechEvent>;
}
