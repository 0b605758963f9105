pub mod input;
pub mod keypad;
pub mod ratatui_impl;
pub mod render;

pub use input::{AppEvent, InputEvent, InputSource, KeyCode, KeyKind, Modifiers};
pub use keypad::TerminalKeypad;
pub use ratatui_impl::RatatuiBackend;
