use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::domain::{
    AtomicRecordingState, RecordingState, SessionError, SessionSnapshot, StateEvent, Transcript,
    TranslationResult,
};

/// Capacity of the presentation event channel.
const STATE_EVENT_CAPACITY: usize = 64;

/// Per-cycle mutable state, guarded by one lock.
///
/// `cycle` is bumped at each recording start and is the guard that lets a
/// late translation completion be recognized as stale and discarded.
#[derive(Debug, Default)]
struct CycleState {
    cycle: u64,
    transcript: Transcript,
    result: Option<TranslationResult>,
    error: Option<SessionError>,
    loading: bool,
}

/// The explicit session state object shared by the controller and the
/// orchestrator. All invariants between recording state, transcript,
/// result, error and the loading flag are enforced here.
#[derive(Debug)]
pub(crate) struct SharedState {
    recording: AtomicRecordingState,
    inner: RwLock<CycleState>,
    events: broadcast::Sender<StateEvent>,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(STATE_EVENT_CAPACITY);
        Self {
            recording: AtomicRecordingState::default(),
            inner: RwLock::new(CycleState::default()),
            events,
        }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: StateEvent) {
        // No subscribers is fine; the presentation layer is optional.
        let _ = self.events.send(event);
    }

    pub(crate) fn recording(&self) -> RecordingState {
        self.recording.load()
    }

    /// Idle -> Recording. Returns false if a session is already active,
    /// which makes request_start idempotent.
    pub(crate) fn try_begin_recording(&self) -> bool {
        self.recording
            .compare_exchange(RecordingState::Idle, RecordingState::Recording)
    }

    /// Recording -> Idle. Returns true only for the caller that observed
    /// the edge, so duplicate SessionEnded events cannot re-trigger
    /// downstream work.
    pub(crate) fn try_finish_recording(&self) -> bool {
        self.recording
            .compare_exchange(RecordingState::Recording, RecordingState::Idle)
    }

    pub(crate) fn force_idle(&self) {
        self.recording.store(RecordingState::Idle);
    }

    pub(crate) fn confirm_recording(&self) {
        self.recording.store(RecordingState::Recording);
    }

    /// Start a new cycle: clear everything from the previous one and bump
    /// the cycle counter so any in-flight translation becomes stale.
    pub(crate) fn begin_cycle(&self) -> u64 {
        let mut inner = self.inner.write();
        inner.cycle += 1;
        inner.transcript.clear();
        inner.result = None;
        inner.error = None;
        inner.loading = false;
        inner.cycle
    }

    /// Defensive clear on SessionStarted: normally already done by
    /// begin_cycle, but the provider's confirmation is authoritative.
    pub(crate) fn clear_session_residue(&self) {
        let mut inner = self.inner.write();
        inner.transcript.clear();
        inner.error = None;
    }

    pub(crate) fn append_final_segment(&self, text: &str) {
        self.inner.write().transcript.push_final_segment(text);
    }

    /// Record a mid-session speech failure and clear any result.
    pub(crate) fn speech_failure(&self, message: &str) {
        self.force_idle();
        let mut inner = self.inner.write();
        inner.error = Some(SessionError::Speech(message.to_string()));
        inner.result = None;
        inner.loading = false;
    }

    /// Record the absence of a speech capability.
    pub(crate) fn unsupported(&self) {
        let mut inner = self.inner.write();
        inner.error = Some(SessionError::Unsupported);
        inner.result = None;
    }

    /// Read the finalized transcript for handoff to translation.
    /// Returns (transcript, cycle, error already set).
    pub(crate) fn finalized_transcript(&self) -> (String, u64, bool) {
        let inner = self.inner.read();
        (
            inner.transcript.as_str().to_string(),
            inner.cycle,
            inner.error.is_some(),
        )
    }

    /// Mark the start of a translation call for `cycle`.
    /// Returns false if the cycle is stale or a call is already in flight.
    pub(crate) fn start_translation(&self, cycle: u64) -> bool {
        let mut inner = self.inner.write();
        if inner.cycle != cycle || inner.loading {
            return false;
        }
        inner.loading = true;
        inner.error = None;
        true
    }

    /// Store the outcome of a translation call, unless the cycle has moved
    /// on, in which case the late result is discarded wholesale.
    /// Returns true if the outcome was applied.
    pub(crate) fn finish_translation(
        &self,
        cycle: u64,
        outcome: Result<TranslationResult, SessionError>,
    ) -> bool {
        let mut inner = self.inner.write();
        if inner.cycle != cycle {
            return false;
        }
        match outcome {
            Ok(result) => {
                inner.result = Some(result);
                inner.error = None;
            }
            Err(error) => {
                inner.error = Some(error);
                inner.result = None;
            }
        }
        // Cleared last, on both outcomes.
        inner.loading = false;
        true
    }

    /// Store the empty result for an empty transcript. No loading phase.
    pub(crate) fn empty_translation(&self, cycle: u64) -> bool {
        let mut inner = self.inner.write();
        if inner.cycle != cycle {
            return false;
        }
        inner.result = Some(TranslationResult::empty());
        inner.loading = false;
        true
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.read();
        SessionSnapshot {
            state: self.recording.load(),
            transcript: inner.transcript.as_str().to_string(),
            loading: inner.loading,
            result: inner.result.clone(),
            error: inner.error.clone(),
        }
    }
}
