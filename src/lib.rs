#![forbid(unsafe_code)]

pub mod adapters;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use adapters::{GeminiTranslator, ManualRecognizer, TomlConfigStore};
pub use app::{InputEvent, PressHoldBinding, SessionController};
pub use domain::{
    AppConfig, DomainError, RecordingState, SessionError, SessionSnapshot, StateEvent,
    TranslationResult,
};
pub use infrastructure::init_logging;
pub use ports::{BrailleTranslator, ConfigStore, SpeechEvent, SpeechRecognizer, SpeechSegment};
