pub mod joystick;
pub mod keymap;

use std::time::{Duration, Instant};

use chordpad_types::{Chord, ChordType, Key, ScaleType};

pub use joystick::{classify, modifier_for, ChordModifier, Direction, JoystickState};
pub use keymap::{KeyFunction, KeyMap};

/// Number of inversion steps a degree key cycles through.
pub const DEFAULT_INVERSION_CYCLE: u8 = 4;
/// Joystick deflection (from centre, 0-127 scale) below which samples are ignored.
pub const DEFAULT_DEADZONE: u8 = 36;
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(300);
pub const DEFAULT_INVERSION_MODE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_NOTE_ON_VELOCITY: u8 = 127;
pub const DEFAULT_NOTE_OFF_VELOCITY: u8 = 0;

/// Tuning constants for the state machine, fixed once the host has loaded its config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub keymap: KeyMap,
    pub deadzone: u8,
    pub grace_period: Duration,
    pub inversion_cycle: u8,
    /// Inactivity after which the inversion-assign sub-mode exits by itself.
    /// `None` keeps it open until toggled off.
    pub inversion_mode_timeout: Option<Duration>,
    pub note_on_velocity: u8,
    pub note_off_velocity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keymap: KeyMap::default(),
            deadzone: DEFAULT_DEADZONE,
            grace_period: DEFAULT_GRACE_PERIOD,
            inversion_cycle: DEFAULT_INVERSION_CYCLE,
            inversion_mode_timeout: Some(DEFAULT_INVERSION_MODE_TIMEOUT),
            note_on_velocity: DEFAULT_NOTE_ON_VELOCITY,
            note_off_velocity: DEFAULT_NOTE_OFF_VELOCITY,
        }
    }
}

/// Inversion assigned to each scale-degree key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InversionTable([u8; 7]);

impl InversionTable {
    pub fn get(&self, degree: u8) -> u8 {
        self.0[degree as usize]
    }

    /// Advance `degree` by one step, wrapping at `cycle`. Returns the new count.
    pub fn cycle(&mut self, degree: u8, cycle: u8) -> u8 {
        let slot = &mut self.0[degree as usize];
        *slot = (*slot + 1) % cycle.max(1);
        *slot
    }

    pub fn as_slice(&self) -> &[u8; 7] {
        &self.0
    }
}

/// The one chord currently held on the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundingChord {
    pub notes: Chord,
    /// Un-inverted root pitch the chord was built on.
    pub root: i32,
    pub chord_type: ChordType,
}

/// Everything the chord state machine owns. Created once, mutated only by dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub root: Key,
    pub scale: ScaleType,
    pub inversions: InversionTable,
    pub sounding: Option<SoundingChord>,
    /// Degree presses cycle inversions instead of sounding chords.
    pub inversion_assign: bool,
    /// Last time the sub-mode was entered or used, for its timeout.
    pub inversion_assign_touched: Option<Instant>,
    pub joystick: JoystickState,
}

impl EngineState {
    pub fn new() -> Self {
        Self::with_defaults(Key::default(), ScaleType::default())
    }

    pub fn with_defaults(root: Key, scale: ScaleType) -> Self {
        Self {
            root,
            scale,
            inversions: InversionTable::default(),
            sounding: None,
            inversion_assign: false,
            inversion_assign_touched: None,
            joystick: JoystickState::default(),
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding.is_some()
    }

    /// e.g. "D Dorian"
    pub fn key_label(&self) -> String {
        format!("{} {}", self.root.name(), self.scale.name())
    }

    /// Text the display should show when nothing transient is on it.
    pub fn idle_text(&self) -> String {
        match &self.sounding {
            Some(sounding) => sounding.notes.name().to_string(),
            None => String::new(),
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
