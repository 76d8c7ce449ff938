use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::orchestrator::TranslationOrchestrator;
use crate::app::state::SharedState;
use crate::domain::{RecordingState, SessionError, SessionSnapshot, StateEvent};
use crate::ports::{BrailleTranslator, SpeechEvent, SpeechRecognizer};

/// Owns the recording lifecycle: mediates between input requests and the
/// speech capability, accumulates the transcript, and hands completed
/// transcripts to the translation orchestrator.
///
/// The provider's ended/error events are the sole authority for the Idle
/// transition; request_stop only asks the provider to wind down.
pub struct SessionController {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    orchestrator: Arc<TranslationOrchestrator>,
    state: Arc<SharedState>,
}

impl SessionController {
    /// Create a controller with an optional speech capability.
    ///
    /// `recognizer` is resolved once at startup; `None` means the host
    /// environment has no speech support, and every start request will
    /// surface an Unsupported error instead.
    pub fn new(
        recognizer: Option<Arc<dyn SpeechRecognizer>>,
        translator: Arc<dyn BrailleTranslator>,
    ) -> Self {
        let state = Arc::new(SharedState::new());
        let orchestrator = Arc::new(TranslationOrchestrator::new(translator, Arc::clone(&state)));
        Self {
            recognizer,
            orchestrator,
            state,
        }
    }

    /// Start a new recording cycle.
    ///
    /// No-op if already recording. Failures never propagate to the caller;
    /// they land in the session error state.
    pub async fn request_start(&self) {
        let Some(recognizer) = self.recognizer.clone() else {
            warn!("start requested but no speech capability is available");
            self.state.unsupported();
            self.state.emit(StateEvent::Failed {
                error: SessionError::Unsupported,
            });
            return;
        };

        if !self.state.try_begin_recording() {
            debug!("start requested while already recording, ignoring");
            return;
        }

        let cycle = self.state.begin_cycle();
        info!(cycle, "recording started");
        self.state.emit(StateEvent::RecordingStarted);

        if let Err(err) = recognizer.begin().await {
            warn!(error = %err, "speech session failed to start");
            self.state.speech_failure(&err.to_string());
            self.state.emit(StateEvent::Failed {
                error: SessionError::Speech(err.to_string()),
            });
        }
    }

    /// Ask the provider to end the current session.
    ///
    /// No-op unless recording. The state stays Recording until the
    /// provider's own SessionEnded (or SessionError) arrives.
    pub async fn request_stop(&self) {
        if !self.state.recording().can_stop() {
            debug!("stop requested while idle, ignoring");
            return;
        }
        if let Some(recognizer) = &self.recognizer {
            if let Err(err) = recognizer.end().await {
                warn!(error = %err, "speech session stop request failed");
            }
        }
    }

    /// Dispatch one provider event.
    pub fn handle_speech_event(&self, event: SpeechEvent) {
        match event {
            SpeechEvent::SessionStarted => {
                // The provider's confirmation is authoritative: make sure
                // we are in Recording and drop any stale residue.
                self.state.confirm_recording();
                self.state.clear_session_residue();
                debug!("speech session confirmed");
            }
            SpeechEvent::Segments(segments) => {
                for segment in segments.iter().filter(|s| s.is_final) {
                    self.state.append_final_segment(&segment.text);
                }
            }
            SpeechEvent::SessionError { message } => {
                warn!(message = %message, "speech session error");
                self.state.speech_failure(&message);
                self.state.emit(StateEvent::Failed {
                    error: SessionError::Speech(message),
                });
            }
            SpeechEvent::SessionEnded => {
                // Fires for requested stops and provider-initiated ends
                // alike. Only the Recording -> Idle edge triggers the
                // translation handoff; an end that follows an error (the
                // state is already Idle then) does not.
                if !self.state.try_finish_recording() {
                    debug!("session end while already idle, ignoring");
                    return;
                }
                info!("recording stopped");
                self.state.emit(StateEvent::RecordingStopped);

                let (transcript, cycle, has_error) = self.state.finalized_transcript();
                if has_error {
                    return;
                }
                self.orchestrator.on_transcript_finalized(transcript, cycle);
            }
        }
    }

    /// Spawn a task pumping provider events into the controller.
    /// Returns None when no speech capability is available.
    pub fn spawn_event_loop(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        // Subscribe before spawning so no event emitted between this call
        // and the task's first poll can be missed.
        let mut events = self.recognizer.as_ref()?.subscribe();
        let controller = Arc::clone(self);
        Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => controller.handle_speech_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "speech event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }))
    }

    /// Current recording state (lock-free).
    pub fn recording_state(&self) -> RecordingState {
        self.state.recording()
    }

    /// Point-in-time view for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    /// Subscribe to presentation events.
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.state.subscribe()
    }
}
