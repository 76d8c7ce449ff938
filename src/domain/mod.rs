pub mod config;
pub mod error;
pub mod session;
pub mod transcript;
pub mod translation;

pub use config::AppConfig;
pub use error::{DomainError, SessionError};
pub use session::{AtomicRecordingState, RecordingState, SessionSnapshot, StateEvent};
pub use transcript::Transcript;
pub use translation::TranslationResult;
