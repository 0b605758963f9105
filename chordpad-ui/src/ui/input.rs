use std::time::{Duration, Instant};

/// Top-level input event: keyboard or resize
#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    Key(InputEvent),
    #[allow(dead_code)]
    Resize(u16, u16),
}

/// Key codes for keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Escape,
    Up,
    Down,
    Left,
    Right,
    Other,
}

/// Modifier key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const fn none() -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    #[allow(dead_code)]
    pub const fn ctrl() -> Self {
        Self {
            ctrl: true,
            alt: false,
            shift: false,
        }
    }
}

/// Press, auto-repeat or release. Releases only arrive from terminals that
/// speak the Kitty keyboard protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Press,
    Repeat,
    Release,
}

/// Input event from the user
#[derive(Debug, Clone, Copy)]
pub struct InputEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    pub timestamp: Instant,
    pub kind: KeyKind,
}

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.modifiers == other.modifiers && self.kind == other.kind
    }
}

impl Eq for InputEvent {}

impl InputEvent {
    pub fn new(key: KeyCode, modifiers: Modifiers, kind: KeyKind) -> Self {
        Self { key, modifiers, timestamp: Instant::now(), kind }
    }

    pub fn press(key: KeyCode) -> Self {
        Self::new(key, Modifiers::none(), KeyKind::Press)
    }

    #[allow(dead_code)]
    pub fn release(key: KeyCode) -> Self {
        Self::new(key, Modifiers::none(), KeyKind::Release)
    }

    /// Esc, Ctrl+C or Ctrl+Q.
    pub fn is_quit(&self) -> bool {
        if self.kind == KeyKind::Release {
            return false;
        }
        match self.key {
            KeyCode::Escape => true,
            KeyCode::Char('c') | KeyCode::Char('q') => self.modifiers.ctrl,
            _ => false,
        }
    }
}

/// Trait for reading input events
pub trait InputSource {
    /// Poll for an input event with a timeout
    /// Returns None if no event is available within the timeout
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_keys() {
        assert!(InputEvent::press(KeyCode::Escape).is_quit());
        assert!(InputEvent::new(KeyCode::Char('c'), Modifiers::ctrl(), KeyKind::Press).is_quit());
        assert!(!InputEvent::press(KeyCode::Char('c')).is_quit());
        assert!(!InputEvent::release(KeyCode::Escape).is_quit());
    }
}
