use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::state::SharedState;
use crate::domain::{SessionError, StateEvent, TranslationResult};
use crate::ports::BrailleTranslator;

/// Reacts to a finalized transcript and drives exactly one translation
/// call per completed recording cycle.
///
/// There is no true cancellation of an in-flight call: a new recording
/// start bumps the cycle counter instead, and a completion carrying a
/// stale cycle is discarded without touching state.
pub struct TranslationOrchestrator {
    translator: Arc<dyn BrailleTranslator>,
    state: Arc<SharedState>,
}

impl TranslationOrchestrator {
    pub(crate) fn new(translator: Arc<dyn BrailleTranslator>, state: Arc<SharedState>) -> Self {
        Self { translator, state }
    }

    /// Handle the Recording -> Idle edge for a cleanly ended session.
    ///
    /// Empty or whitespace-only transcripts yield an empty result with no
    /// provider call. Non-empty transcripts launch one translation task;
    /// the caller is not blocked on its completion.
    pub(crate) fn on_transcript_finalized(self: &Arc<Self>, transcript: String, cycle: u64) {
        let text = transcript.trim().to_string();
        if text.is_empty() {
            if self.state.empty_translation(cycle) {
                debug!("empty transcript, skipping translation call");
                self.state.emit(StateEvent::TranslationReady {
                    result: TranslationResult::empty(),
                });
            }
            return;
        }

        if !self.state.start_translation(cycle) {
            debug!(cycle, "translation not started: stale cycle or already in flight");
            return;
        }
        self.state.emit(StateEvent::TranslationStarted);
        info!(chars = text.len(), "translating transcript");

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = this.translator.translate(&text).await;
            this.complete(cycle, text, outcome);
        });
    }

    fn complete(
        &self,
        cycle: u64,
        original: String,
        outcome: Result<String, crate::domain::DomainError>,
    ) {
        let outcome = match outcome {
            Ok(braille) => Ok(TranslationResult { original, braille }),
            Err(err) => {
                warn!(error = %err, "translation call failed");
                Err(SessionError::Translation(err.to_string()))
            }
        };

        let event = match &outcome {
            Ok(result) => StateEvent::TranslationReady {
                result: result.clone(),
            },
            Err(error) => StateEvent::Failed {
                error: error.clone(),
            },
        };

        if self.state.finish_translation(cycle, outcome) {
            self.state.emit(event);
        } else {
            debug!(cycle, "discarding translation result for a stale cycle");
        }
    }
}
