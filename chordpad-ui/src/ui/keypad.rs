use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use chordpad_core::action::KeyEvent;
use chordpad_core::io;
use chordpad_core::state::joystick::JOYSTICK_CENTER;

use super::{InputEvent, KeyCode, KeyKind};

/// Keypad rows on the computer keyboard, top to bottom.
const KEY_ROWS: [[char; 4]; 3] = [['1', '2', '3', '4'], ['q', 'w', 'e', 'r'], ['a', 's', 'd', 'f']];

/// Without key-release reporting, a key counts as held until it stops repeating.
/// Long enough to bridge the terminal's initial auto-repeat delay.
const HOLD_TIMEOUT: Duration = Duration::from_millis(600);

/// Physical keypad position for a character, row-major.
pub fn physical_key(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    KEY_ROWS.iter().enumerate().find_map(|(row, keys)| {
        keys.iter()
            .position(|&k| k == c)
            .map(|col| (row * keys.len() + col) as u8)
    })
}

/// Character bound to a physical keypad position.
pub fn key_char(key: u8) -> Option<char> {
    let row = key as usize / 4;
    let col = key as usize % 4;
    KEY_ROWS.get(row).map(|keys| keys[col])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

/// Terminal emulation of the keypad matrix and the joystick.
///
/// Rows `1234`/`qwer`/`asdf` are the twelve keypad positions, arrows deflect
/// the stick to full scale. When the terminal reports releases they are used
/// as-is; otherwise held keys are tracked by repeat timestamps and released
/// after [`HOLD_TIMEOUT`] without a repeat (see [`TerminalKeypad::check_releases`]).
pub struct TerminalKeypad {
    pending: VecDeque<KeyEvent>,
    active_keys: HashMap<u8, Instant>,
    arrows: HashMap<Arrow, Instant>,
    native_releases: bool,
    release_timeout: Duration,
}

impl TerminalKeypad {
    pub fn new(native_releases: bool) -> Self {
        Self {
            pending: VecDeque::new(),
            active_keys: HashMap::new(),
            arrows: HashMap::new(),
            native_releases,
            release_timeout: HOLD_TIMEOUT,
        }
    }

    /// Feed one terminal key event. Returns false if the key is not part of the controller.
    pub fn handle_key(&mut self, event: &InputEvent, now: Instant) -> bool {
        if event.modifiers.ctrl || event.modifiers.alt {
            return false;
        }
        match event.key {
            KeyCode::Char(c) => match physical_key(c) {
                Some(key) => {
                    self.handle_keypad(key, event.kind, now);
                    true
                }
                None => false,
            },
            KeyCode::Up => self.handle_arrow(Arrow::Up, event.kind, now),
            KeyCode::Down => self.handle_arrow(Arrow::Down, event.kind, now),
            KeyCode::Left => self.handle_arrow(Arrow::Left, event.kind, now),
            KeyCode::Right => self.handle_arrow(Arrow::Right, event.kind, now),
            KeyCode::Escape | KeyCode::Other => false,
        }
    }

    fn handle_keypad(&mut self, key: u8, kind: KeyKind, now: Instant) {
        match kind {
            KeyKind::Press | KeyKind::Repeat => {
                if let std::collections::hash_map::Entry::Occupied(mut e) = self.active_keys.entry(key) {
                    // Sustain: refresh timestamp, no new press
                    e.insert(now);
                    return;
                }
                self.active_keys.insert(key, now);
                self.pending.push_back(KeyEvent::press(key));
            }
            KeyKind::Release => {
                if self.active_keys.remove(&key).is_some() {
                    self.pending.push_back(KeyEvent::release(key));
                }
            }
        }
    }

    fn handle_arrow(&mut self, arrow: Arrow, kind: KeyKind, now: Instant) -> bool {
        match kind {
            KeyKind::Press | KeyKind::Repeat => {
                // Opposite directions cancel; the latest wins
                let opposite = match arrow {
                    Arrow::Up => Arrow::Down,
                    Arrow::Down => Arrow::Up,
                    Arrow::Left => Arrow::Right,
                    Arrow::Right => Arrow::Left,
                };
                self.arrows.remove(&opposite);
                self.arrows.insert(arrow, now);
            }
            KeyKind::Release => {
                self.arrows.remove(&arrow);
            }
        }
        true
    }

    /// Release keys and arrows that stopped repeating. No-op when the
    /// terminal reports releases itself.
    pub fn check_releases(&mut self, now: Instant) {
        if self.native_releases {
            return;
        }
        let timeout = self.release_timeout;
        let mut released: Vec<u8> = Vec::new();
        self.active_keys.retain(|&key, last_time| {
            if now.saturating_duration_since(*last_time) > timeout {
                released.push(key);
                false
            } else {
                true
            }
        });
        released.sort_unstable();
        for key in released {
            self.pending.push_back(KeyEvent::release(key));
        }
        self.arrows
            .retain(|_, last_time| now.saturating_duration_since(*last_time) <= timeout);
    }

    /// Forget held keys and queued events without emitting releases.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.active_keys.clear();
        self.arrows.clear();
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Physical keys currently held, sorted.
    pub fn held_keys(&self) -> Vec<u8> {
        let mut keys: Vec<u8> = self.active_keys.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Stick position implied by the held arrows.
    pub fn axes(&self) -> (u8, u8) {
        let center = JOYSTICK_CENTER as u8;
        let x = if self.arrows.contains_key(&Arrow::Left) {
            0
        } else if self.arrows.contains_key(&Arrow::Right) {
            127
        } else {
            center
        };
        let y = if self.arrows.contains_key(&Arrow::Down) {
            0
        } else if self.arrows.contains_key(&Arrow::Up) {
            127
        } else {
            center
        };
        (x, y)
    }
}

impl io::InputSource for TerminalKeypad {
    fn poll_key_event(&mut self) -> Option<KeyEvent> {
        self.pending.pop_front()
    }

    fn sample_axes(&mut self) -> (u8, u8) {
        self.axes()
    }
}
