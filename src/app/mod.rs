pub mod controller;
pub mod input;
pub mod orchestrator;
mod state;

pub use controller::SessionController;
pub use input::{InputEvent, PressHoldBinding};
