//! Host integration points: where input comes from and where chords and text go.
//!
//! The engine never talks to hardware directly. Hosts implement these traits
//! (the terminal binary, the MIDI adapter); the recording variants below let
//! tests and headless runs observe exactly what the engine emitted.

use std::collections::VecDeque;

use crate::action::KeyEvent;
use crate::state::joystick::JOYSTICK_CENTER;

/// Debounced keypad events plus the current joystick position.
pub trait InputSource {
    /// Next pending key transition, if any. Never blocks.
    fn poll_key_event(&mut self) -> Option<KeyEvent>;

    /// Current axes, normalized to 0-127 (larger `y` is up).
    fn sample_axes(&mut self) -> (u8, u8);
}

/// Sound-producing output. Called once per note, in chord order.
pub trait ChordOutput {
    fn note_on(&mut self, pitch: i32, velocity: u8);
    fn note_off(&mut self, pitch: i32, velocity: u8);
}

/// Small status display.
pub trait DisplaySink {
    fn set_text(&mut self, text: &str);
}

/// One call recorded by [`RecordingOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputOp {
    NoteOn { pitch: i32, velocity: u8 },
    NoteOff { pitch: i32, velocity: u8 },
}

/// Output that records every call for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    ops: Vec<OutputOp>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[OutputOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn note_ons(&self) -> Vec<i32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                OutputOp::NoteOn { pitch, .. } => Some(*pitch),
                _ => None,
            })
            .collect()
    }

    pub fn note_offs(&self) -> Vec<i32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                OutputOp::NoteOff { pitch, .. } => Some(*pitch),
                _ => None,
            })
            .collect()
    }

    /// Pitches switched on and not yet switched off, in the order they started.
    pub fn held(&self) -> Vec<i32> {
        let mut held: Vec<i32> = Vec::new();
        for op in &self.ops {
            match op {
                OutputOp::NoteOn { pitch, .. } => held.push(*pitch),
                OutputOp::NoteOff { pitch, .. } => {
                    if let Some(i) = held.iter().position(|p| p == pitch) {
                        held.remove(i);
                    }
                }
            }
        }
        held
    }
}

impl ChordOutput for RecordingOutput {
    fn note_on(&mut self, pitch: i32, velocity: u8) {
        self.ops.push(OutputOp::NoteOn { pitch, velocity });
    }

    fn note_off(&mut self, pitch: i32, velocity: u8) {
        self.ops.push(OutputOp::NoteOff { pitch, velocity });
    }
}

/// Display that keeps every text it was given.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    texts: Vec<String>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the screen shows now.
    pub fn current(&self) -> &str {
        self.texts.last().map(String::as_str).unwrap_or("")
    }

    pub fn history(&self) -> &[String] {
        &self.texts
    }
}

impl DisplaySink for RecordingDisplay {
    fn set_text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }
}

/// Pre-loaded input: queued key events and a settable stick position.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    keys: VecDeque<KeyEvent>,
    axes: (u8, u8),
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            axes: (JOYSTICK_CENTER as u8, JOYSTICK_CENTER as u8),
        }
    }

    pub fn push(&mut self, event: KeyEvent) -> &mut Self {
        self.keys.push_back(event);
        self
    }

    pub fn press(&mut self, key: u8) -> &mut Self {
        self.push(KeyEvent::press(key))
    }

    pub fn release(&mut self, key: u8) -> &mut Self {
        self.push(KeyEvent::release(key))
    }

    pub fn set_axes(&mut self, x: u8, y: u8) -> &mut Self {
        self.axes = (x, y);
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.set_axes(JOYSTICK_CENTER as u8, JOYSTICK_CENTER as u8)
    }

    pub fn pending(&self) -> usize {
        self.keys.len()
    }
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for ScriptedInput {
    fn poll_key_event(&mut self) -> Option<KeyEvent> {
        self.keys.pop_front()
    }

    fn sample_axes(&mut self) -> (u8, u8) {
        self.axes
    }
}
