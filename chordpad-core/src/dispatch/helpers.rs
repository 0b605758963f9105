use chordpad_types::{build_chord, ChordType};

use crate::state::{EngineState, SoundingChord};

use super::EngineEffect;

/// Stop whatever is sounding. Returns true if a chord was stopped.
pub(super) fn stop_sounding(state: &mut EngineState, effects: &mut Vec<EngineEffect>) -> bool {
    match state.sounding.take() {
        Some(previous) => {
            log::debug!("stop {:?} {:?}", previous.chord_type, previous.notes.notes());
            effects.push(EngineEffect::StopChord(previous.notes));
            true
        }
        None => false,
    }
}

/// Replace the sounding chord with `chord_type` on `root`.
///
/// The previous chord's stop is always pushed before the new start, so two
/// starts never follow each other on the output.
pub(super) fn replace_sounding(
    state: &mut EngineState,
    root: i32,
    chord_type: ChordType,
    inversion: u8,
    effects: &mut Vec<EngineEffect>,
) -> bool {
    let notes = build_chord(root, chord_type, inversion);
    if notes.is_empty() {
        log::error!(
            "chord table produced no notes for {:?} on {}; keeping current chord",
            chord_type,
            root
        );
        return false;
    }

    stop_sounding(state, effects);
    log::debug!("start {:?} inv {} {:?}", chord_type, inversion, notes.notes());
    effects.push(EngineEffect::StartChord(notes.clone()));
    effects.push(EngineEffect::SetText(notes.name().to_string()));
    state.sounding = Some(SoundingChord { notes, root, chord_type });
    true
}
