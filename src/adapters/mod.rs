pub mod config_store;
pub mod gemini;
pub mod manual;

pub use config_store::TomlConfigStore;
pub use gemini::GeminiTranslator;
pub use manual::ManualRecognizer;
