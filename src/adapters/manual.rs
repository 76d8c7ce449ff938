use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::DomainError;
use crate::ports::{SpeechEvent, SpeechRecognizer, SpeechSegment};

/// Capacity of the speech event channel.
const SPEECH_EVENT_CAPACITY: usize = 64;

/// Speech recognizer driven by the host instead of a microphone.
///
/// Used where no platform speech capability exists (the demo binary feeds
/// it typed text) and by tests. It honors the provider contract: begin and
/// end are confirmed through events, segments only flow while a session is
/// active, and a failure is followed by a session end, matching real
/// speech backends.
pub struct ManualRecognizer {
    events: broadcast::Sender<SpeechEvent>,
    active: AtomicBool,
}

impl ManualRecognizer {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(SPEECH_EVENT_CAPACITY);
        Self {
            events,
            active: AtomicBool::new(false),
        }
    }

    fn send(&self, event: SpeechEvent) {
        // No subscribers is fine; events are fire-and-forget.
        let _ = self.events.send(event);
    }

    /// Feed one recognized segment into the active session.
    /// Ignored when no session is active.
    pub fn push_segment(&self, text: &str, is_final: bool) {
        if !self.active.load(Ordering::Acquire) {
            debug!("segment pushed with no active session, ignoring");
            return;
        }
        let segment = if is_final {
            SpeechSegment::final_text(text)
        } else {
            SpeechSegment::interim(text)
        };
        self.send(SpeechEvent::Segments(vec![segment]));
    }

    /// Feed a batch of segments, as providers deliver per result event.
    pub fn push_segments(&self, segments: Vec<SpeechSegment>) {
        if !self.active.load(Ordering::Acquire) {
            debug!("segments pushed with no active session, ignoring");
            return;
        }
        self.send(SpeechEvent::Segments(segments));
    }

    /// Report a mid-session failure. Emits the error followed by a
    /// session end, the ordering real backends produce.
    pub fn fail(&self, message: &str) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        self.send(SpeechEvent::SessionError {
            message: message.to_string(),
        });
        self.send(SpeechEvent::SessionEnded);
    }

    /// Provider-initiated termination, e.g. a silence timeout.
    pub fn terminate(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            self.send(SpeechEvent::SessionEnded);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Default for ManualRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for ManualRecognizer {
    async fn begin(&self) -> Result<(), DomainError> {
        if self.active.swap(true, Ordering::AcqRel) {
            return Err(DomainError::Speech("session already active".to_string()));
        }
        self.send(SpeechEvent::SessionStarted);
        Ok(())
    }

    async fn end(&self) -> Result<(), DomainError> {
        if self.active.swap(false, Ordering::AcqRel) {
            self.send(SpeechEvent::SessionEnded);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SpeechEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_begin_emits_session_started() {
        let recognizer = ManualRecognizer::new();
        let mut events = recognizer.subscribe();

        recognizer.begin().await.unwrap();
        assert!(recognizer.is_active());
        assert!(matches!(
            events.recv().await.unwrap(),
            SpeechEvent::SessionStarted
        ));
    }

    #[tokio::test]
    async fn test_double_begin_rejected() {
        let recognizer = ManualRecognizer::new();
        recognizer.begin().await.unwrap();
        assert!(recognizer.begin().await.is_err());
    }

    #[tokio::test]
    async fn test_segments_only_while_active() {
        let recognizer = ManualRecognizer::new();
        let mut events = recognizer.subscribe();

        recognizer.push_segment("dropped", true);

        recognizer.begin().await.unwrap();
        recognizer.push_segment("kept", true);
        recognizer.end().await.unwrap();

        assert!(matches!(
            events.recv().await.unwrap(),
            SpeechEvent::SessionStarted
        ));
        match events.recv().await.unwrap() {
            SpeechEvent::Segments(segments) => {
                assert_eq!(segments, vec![SpeechSegment::final_text("kept")]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            events.recv().await.unwrap(),
            SpeechEvent::SessionEnded
        ));
    }

    #[tokio::test]
    async fn test_fail_emits_error_then_end() {
        let recognizer = ManualRecognizer::new();
        let mut events = recognizer.subscribe();

        recognizer.begin().await.unwrap();
        recognizer.fail("permission denied");
        assert!(!recognizer.is_active());

        assert!(matches!(
            events.recv().await.unwrap(),
            SpeechEvent::SessionStarted
        ));
        match events.recv().await.unwrap() {
            SpeechEvent::SessionError { message } => assert_eq!(message, "permission denied"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            events.recv().await.unwrap(),
            SpeechEvent::SessionEnded
        ));
    }

    #[tokio::test]
    async fn test_end_without_session_is_silent() {
        let recognizer = ManualRecognizer::new();
        let mut events = recognizer.subscribe();

        recognizer.end().await.unwrap();
        recognizer.terminate();

        assert!(events.try_recv().is_err());
    }
}
