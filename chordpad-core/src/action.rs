//! Input events consumed by the engine and the result of dispatching them.

use serde::{Deserialize, Serialize};

/// Position on the matrix keypad, row-major from the top-left key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalKey(pub u8);

impl PhysicalKey {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A debounced key transition from the keypad scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: PhysicalKey,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(key: u8) -> Self {
        Self { key: PhysicalKey(key), pressed: true }
    }

    pub fn release(key: u8) -> Self {
        Self { key: PhysicalKey(key), pressed: false }
    }
}

/// Anything the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineInput {
    Key(KeyEvent),
    /// Joystick sample, both axes normalized to 0-127 with larger `y` meaning up.
    Axes { x: u8, y: u8 },
}

/// What a dispatch did, for the host loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    /// A different chord (or silence) is now sounding.
    pub chord_changed: bool,
    /// The reload key was pressed; the host should restart the engine.
    pub reload: bool,
    /// Key events consumed during this dispatch, in order.
    pub key_events: Vec<KeyEvent>,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_chord_change() -> Self {
        Self { chord_changed: true, ..Self::default() }
    }

    pub fn with_reload() -> Self {
        Self { reload: true, ..Self::default() }
    }

    pub fn merge(&mut self, other: DispatchResult) {
        self.chord_changed = self.chord_changed || other.chord_changed;
        self.reload = self.reload || other.reload;
        self.key_events.extend(other.key_events);
    }
}
