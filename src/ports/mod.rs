pub mod config;
pub mod speech;
pub mod translator;

pub use config::ConfigStore;
pub use speech::{SpeechEvent, SpeechRecognizer, SpeechSegment};
pub use translator::BrailleTranslator;
