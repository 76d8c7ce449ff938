use std::sync::Arc;

use parking_lot::Mutex;

use crate::app::controller::SessionController;

/// Physical input events from the presentation layer.
///
/// Keyboard and pointer are two independent channels mapped onto the same
/// press-and-hold gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Spacebar pressed. `repeat` is true for OS auto-repeat while held.
    KeyDown { repeat: bool },
    /// Spacebar released.
    KeyUp,
    /// Mouse-down or touch-start on the control.
    PointerDown,
    /// Mouse-up or touch-end on the control.
    PointerUp,
}

#[derive(Debug, Default)]
struct Held {
    key: bool,
    pointer: bool,
}

impl Held {
    fn any(&self) -> bool {
        self.key || self.pointer
    }
}

enum Action {
    Start,
    Stop,
}

/// Maps keyboard and pointer press/release events onto start/stop requests.
///
/// Start fires on the 0 -> 1 held-channels edge and stop on the 1 -> 0
/// edge, so holding both channels at once cannot double-start a session or
/// stop it while one channel is still held. Auto-repeat key-downs are
/// ignored entirely.
pub struct PressHoldBinding {
    controller: Arc<SessionController>,
    held: Mutex<Held>,
}

impl PressHoldBinding {
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self {
            controller,
            held: Mutex::new(Held::default()),
        }
    }

    pub async fn handle(&self, event: InputEvent) {
        let action = {
            let mut held = self.held.lock();
            match event {
                InputEvent::KeyDown { repeat: true } => None,
                InputEvent::KeyDown { repeat: false } => {
                    let was_held = held.any();
                    held.key = true;
                    (!was_held).then_some(Action::Start)
                }
                InputEvent::KeyUp => {
                    let was_held = held.any();
                    held.key = false;
                    (was_held && !held.any()).then_some(Action::Stop)
                }
                InputEvent::PointerDown => {
                    let was_held = held.any();
                    held.pointer = true;
                    (!was_held).then_some(Action::Start)
                }
                InputEvent::PointerUp => {
                    let was_held = held.any();
                    held.pointer = false;
                    (was_held && !held.any()).then_some(Action::Stop)
                }
            }
        };

        match action {
            Some(Action::Start) => self.controller.request_start().await,
            Some(Action::Stop) => self.controller.request_stop().await,
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::broadcast;

    use crate::domain::DomainError;
    use crate::ports::{BrailleTranslator, SpeechEvent, SpeechRecognizer};

    #[derive(Default)]
    struct CountingRecognizer {
        begins: AtomicUsize,
        ends: AtomicUsize,
    }

    #[async_trait]
    impl SpeechRecognizer for CountingRecognizer {
        async fn begin(&self) -> Result<(), DomainError> {
            self.begins.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn end(&self) -> Result<(), DomainError> {
            self.ends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<SpeechEvent> {
            let (sender, receiver) = broadcast::channel(8);
            drop(sender);
            receiver
        }
    }

    struct NoopTranslator;

    #[async_trait]
    impl BrailleTranslator for NoopTranslator {
        async fn translate(&self, _text: &str) -> Result<String, DomainError> {
            Ok(String::new())
        }
    }

    fn binding() -> (PressHoldBinding, Arc<CountingRecognizer>) {
        let recognizer = Arc::new(CountingRecognizer::default());
        let controller = Arc::new(SessionController::new(
            Some(recognizer.clone()),
            Arc::new(NoopTranslator),
        ));
        (PressHoldBinding::new(controller), recognizer)
    }

    #[tokio::test]
    async fn test_auto_repeat_starts_once() {
        let (binding, recognizer) = binding();

        binding.handle(InputEvent::KeyDown { repeat: false }).await;
        binding.handle(InputEvent::KeyDown { repeat: true }).await;
        binding.handle(InputEvent::KeyDown { repeat: true }).await;
        binding.handle(InputEvent::KeyDown { repeat: true }).await;
        binding.handle(InputEvent::KeyUp).await;

        assert_eq!(recognizer.begins.load(Ordering::SeqCst), 1);
        assert_eq!(recognizer.ends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_channels_held_single_session() {
        let (binding, recognizer) = binding();

        binding.handle(InputEvent::KeyDown { repeat: false }).await;
        binding.handle(InputEvent::PointerDown).await;
        // Releasing one channel keeps the session alive.
        binding.handle(InputEvent::KeyUp).await;
        assert_eq!(recognizer.ends.load(Ordering::SeqCst), 0);
        binding.handle(InputEvent::PointerUp).await;

        assert_eq!(recognizer.begins.load(Ordering::SeqCst), 1);
        assert_eq!(recognizer.ends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pointer_only_press_and_release() {
        let (binding, recognizer) = binding();

        binding.handle(InputEvent::PointerDown).await;
        binding.handle(InputEvent::PointerUp).await;

        assert_eq!(recognizer.begins.load(Ordering::SeqCst), 1);
        assert_eq!(recognizer.ends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_without_press_is_noop() {
        let (binding, recognizer) = binding();

        binding.handle(InputEvent::KeyUp).await;
        binding.handle(InputEvent::PointerUp).await;

        assert_eq!(recognizer.begins.load(Ordering::SeqCst), 0);
        assert_eq!(recognizer.ends.load(Ordering::SeqCst), 0);
    }
}
