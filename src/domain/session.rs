use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

use crate::domain::error::SessionError;
use crate::domain::translation::TranslationResult;

/// Recording session state machine.
///
/// State transitions:
/// - Idle -> Recording (request_start)
/// - Recording -> Idle (provider SessionEnded or SessionError)
///
/// Note: request_stop does not transition the state. The provider's own
/// ended/error event is the sole authority for the Idle transition, so a
/// stop request and the actual session end may be separated by a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RecordingState {
    /// Ready to record, no active speech session.
    Idle = 0,
    /// A speech session is active.
    Recording = 1,
}

impl RecordingState {
    /// Check if a recording can be started from this state.
    #[must_use]
    pub fn can_start(&self) -> bool {
        matches!(self, RecordingState::Idle)
    }

    /// Check if a stop request is meaningful in this state.
    #[must_use]
    pub fn can_stop(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }
}

impl From<u8> for RecordingState {
    fn from(value: u8) -> Self {
        match value {
            1 => RecordingState::Recording,
            _ => RecordingState::Idle,
        }
    }
}

impl From<RecordingState> for u8 {
    fn from(state: RecordingState) -> Self {
        state as u8
    }
}

/// Atomic wrapper for RecordingState for lock-free reads and edge detection.
#[derive(Debug)]
pub struct AtomicRecordingState(AtomicU8);

impl AtomicRecordingState {
    pub fn new(state: RecordingState) -> Self {
        Self(AtomicU8::new(state.into()))
    }

    pub fn load(&self) -> RecordingState {
        self.0.load(Ordering::Acquire).into()
    }

    pub fn store(&self, state: RecordingState) {
        self.0.store(state.into(), Ordering::Release);
    }

    /// Compare and swap, returns true if the transition was taken.
    ///
    /// This is how start idempotence and the end-of-session edge are
    /// detected: only the caller that wins the exchange acts on it.
    pub fn compare_exchange(&self, current: RecordingState, new: RecordingState) -> bool {
        self.0
            .compare_exchange(current.into(), new.into(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for AtomicRecordingState {
    fn default() -> Self {
        Self::new(RecordingState::Idle)
    }
}

/// Point-in-time view of the session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Current recording state.
    pub state: RecordingState,
    /// Accumulated final transcript for the current cycle.
    pub transcript: String,
    /// True while a translation call is outstanding.
    pub loading: bool,
    /// Result of the most recent completed translation, if any.
    pub result: Option<TranslationResult>,
    /// Active error for the current cycle, if any.
    pub error: Option<SessionError>,
}

/// Events emitted toward the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum StateEvent {
    /// A recording cycle started.
    RecordingStarted,
    /// The speech session ended and the state returned to Idle.
    RecordingStopped,
    /// A translation call was issued for the finalized transcript.
    TranslationStarted,
    /// A translation completed for the current cycle.
    TranslationReady { result: TranslationResult },
    /// The current cycle failed (speech, translation, or capability).
    Failed { error: SessionError },
}
