//! End-to-end flow through the event loop: input binding -> controller ->
//! manual recognizer -> orchestrator -> translation result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use brailletalk::adapters::ManualRecognizer;
use brailletalk::app::{InputEvent, PressHoldBinding, SessionController};
use brailletalk::domain::{DomainError, RecordingState, SessionSnapshot, TranslationResult};
use brailletalk::ports::BrailleTranslator;

struct TableTranslator;

#[async_trait]
impl BrailleTranslator for TableTranslator {
    async fn translate(&self, text: &str) -> Result<String, DomainError> {
        match text {
            "hello" => Ok("⠓⠑⠇⠇⠕".to_string()),
            "hello world" => Ok("⠓⠑⠇⠇⠕ ⠺⠕⠗⠇⠙".to_string()),
            other => Err(DomainError::Translation(format!(
                "no translation for {other:?}"
            ))),
        }
    }
}

fn wiring() -> (
    Arc<SessionController>,
    Arc<ManualRecognizer>,
    PressHoldBinding,
) {
    let recognizer = Arc::new(ManualRecognizer::new());
    let speech: Arc<dyn brailletalk::ports::SpeechRecognizer> = recognizer.clone();
    let controller = Arc::new(SessionController::new(Some(speech), Arc::new(TableTranslator)));
    controller.spawn_event_loop().expect("recognizer present");
    let binding = PressHoldBinding::new(controller.clone());
    (controller, recognizer, binding)
}

async fn wait_for(
    controller: &SessionController,
    mut cond: impl FnMut(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    for _ in 0..400 {
        let snapshot = controller.snapshot();
        if cond(&snapshot) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time; last snapshot: {:#?}", controller.snapshot());
}

#[tokio::test]
async fn press_speak_release_produces_braille() {
    let (controller, recognizer, binding) = wiring();

    binding.handle(InputEvent::KeyDown { repeat: false }).await;
    assert_eq!(controller.recording_state(), RecordingState::Recording);

    recognizer.push_segment("hello", true);
    recognizer.push_segment("world", true);

    binding.handle(InputEvent::KeyUp).await;

    let snapshot = wait_for(&controller, |s| s.result.is_some()).await;
    assert_eq!(snapshot.state, RecordingState::Idle);
    assert_eq!(
        snapshot.result.unwrap(),
        TranslationResult {
            original: "hello world".to_string(),
            braille: "⠓⠑⠇⠇⠕ ⠺⠕⠗⠇⠙".to_string(),
        }
    );
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn provider_initiated_end_still_translates() {
    let (controller, recognizer, binding) = wiring();

    binding.handle(InputEvent::PointerDown).await;
    recognizer.push_segment("hello", true);

    // Silence timeout: the provider ends the session on its own.
    recognizer.terminate();

    let snapshot = wait_for(&controller, |s| s.result.is_some()).await;
    assert_eq!(snapshot.state, RecordingState::Idle);
    assert_eq!(snapshot.result.unwrap().braille, "⠓⠑⠇⠇⠕");

    // The later release maps to a stop request, which is a no-op by then.
    binding.handle(InputEvent::PointerUp).await;
    assert_eq!(controller.recording_state(), RecordingState::Idle);
}

#[tokio::test]
async fn speech_failure_surfaces_and_next_attempt_recovers() {
    let (controller, recognizer, binding) = wiring();

    binding.handle(InputEvent::KeyDown { repeat: false }).await;
    recognizer.push_segment("hello", true);
    recognizer.fail("audio-capture");

    let snapshot = wait_for(&controller, |s| s.error.is_some()).await;
    assert_eq!(snapshot.state, RecordingState::Idle);
    assert!(snapshot.result.is_none());

    // Let the session end that trails the error drain before retrying.
    tokio::time::sleep(Duration::from_millis(20)).await;

    // The key is still held from the failed attempt; release and retry.
    binding.handle(InputEvent::KeyUp).await;

    binding.handle(InputEvent::KeyDown { repeat: false }).await;
    let snapshot = wait_for(&controller, |s| s.error.is_none()).await;
    assert_eq!(snapshot.state, RecordingState::Recording);

    recognizer.push_segment("hello", true);
    binding.handle(InputEvent::KeyUp).await;

    let snapshot = wait_for(&controller, |s| s.result.is_some()).await;
    assert_eq!(snapshot.result.unwrap().braille, "⠓⠑⠇⠇⠕");
}

#[tokio::test]
async fn interim_segments_are_discarded() {
    let (controller, recognizer, binding) = wiring();

    binding.handle(InputEvent::KeyDown { repeat: false }).await;
    recognizer.push_segment("hel", false);
    recognizer.push_segment("hello", true);
    recognizer.push_segment("wor", false);
    binding.handle(InputEvent::KeyUp).await;

    let snapshot = wait_for(&controller, |s| s.result.is_some()).await;
    assert_eq!(snapshot.transcript, "hello");
    assert_eq!(snapshot.result.unwrap().original, "hello");
}
