//! EngineEffect: output operations produced by dispatch.
//!
//! Dispatch functions push effects into a `Vec<EngineEffect>` instead of
//! driving the output and display directly. The host applies them once the
//! dispatch returns, so state changes stay testable without any hardware.

use chordpad_types::Chord;
use serde::Serialize;

use crate::io::{ChordOutput, DisplaySink};
use crate::state::EngineConfig;

/// A deferred operation on the output or display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EngineEffect {
    /// Note-off for every note, in chord order.
    StopChord(Chord),
    /// Note-on for every note, in chord order.
    StartChord(Chord),
    SetText(String),
    /// Host should reload its configuration and restart the engine.
    Reload,
}

/// Apply effects in order. Returns true if a reload was requested.
pub fn apply_effects<O, D>(
    effects: impl IntoIterator<Item = EngineEffect>,
    config: &EngineConfig,
    output: &mut O,
    display: &mut D,
) -> bool
where
    O: ChordOutput + ?Sized,
    D: DisplaySink + ?Sized,
{
    let mut reload = false;
    for effect in effects {
        match effect {
            EngineEffect::StopChord(chord) => {
                for &pitch in chord.notes() {
                    output.note_off(pitch, config.note_off_velocity);
                }
            }
            EngineEffect::StartChord(chord) => {
                for &pitch in chord.notes() {
                    output.note_on(pitch, config.note_on_velocity);
                }
            }
            EngineEffect::SetText(text) => display.set_text(&text),
            EngineEffect::Reload => reload = true,
        }
    }
    reload
}
