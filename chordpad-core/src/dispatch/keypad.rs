use std::time::Instant;

use chordpad_types::{chord_type_for_degree, scale_notes};

use crate::action::{DispatchResult, KeyEvent};
use crate::state::{EngineConfig, EngineState, KeyFunction};

use super::helpers::{replace_sounding, stop_sounding};
use super::EngineEffect;

pub(super) fn dispatch_key(
    event: &KeyEvent,
    state: &mut EngineState,
    config: &EngineConfig,
    now: Instant,
    effects: &mut Vec<EngineEffect>,
) -> DispatchResult {
    let Some(function) = config.keymap.lookup(event.key) else {
        log::trace!("unmapped key {:?}", event.key);
        return DispatchResult::none();
    };

    match (function, event.pressed) {
        (KeyFunction::Degree(degree), true) if state.inversion_assign => {
            assign_inversion(degree, state, config, now, effects)
        }
        (KeyFunction::Degree(degree), true) => sound_degree(degree, state, effects),
        (KeyFunction::Degree(_), false) => {
            if stop_sounding(state, effects) {
                effects.push(EngineEffect::SetText(String::new()));
                DispatchResult::with_chord_change()
            } else {
                DispatchResult::none()
            }
        }
        (KeyFunction::AdvanceRoot, true) => {
            state.root = state.root.next();
            log::debug!("root -> {}", state.root.name());
            show_key_when_idle(state, effects);
            DispatchResult::none()
        }
        (KeyFunction::AdvanceScale, true) => {
            state.scale = state.scale.next();
            log::debug!("scale -> {}", state.scale.name());
            show_key_when_idle(state, effects);
            DispatchResult::none()
        }
        (KeyFunction::InversionMode, true) => {
            if state.inversion_assign {
                exit_inversion_mode(state, effects);
            } else {
                state.inversion_assign = true;
                state.inversion_assign_touched = Some(now);
                log::debug!("inversion assignment on");
                effects.push(EngineEffect::SetText("Inv mode".to_string()));
            }
            DispatchResult::none()
        }
        (KeyFunction::Reload, true) => {
            let stopped = stop_sounding(state, effects);
            state.inversion_assign = false;
            state.inversion_assign_touched = None;
            log::info!("reload requested");
            effects.push(EngineEffect::Reload);
            let mut result = DispatchResult::with_reload();
            result.chord_changed = stopped;
            result
        }
        // Function keys act on press only
        (_, false) => DispatchResult::none(),
    }
}

fn sound_degree(
    degree: u8,
    state: &mut EngineState,
    effects: &mut Vec<EngineEffect>,
) -> DispatchResult {
    let root = scale_notes(state.root, state.scale)[degree as usize];
    let chord_type = chord_type_for_degree(state.scale, degree);
    let inversion = state.inversions.get(degree);
    if replace_sounding(state, root, chord_type, inversion, effects) {
        DispatchResult::with_chord_change()
    } else {
        DispatchResult::none()
    }
}

fn assign_inversion(
    degree: u8,
    state: &mut EngineState,
    config: &EngineConfig,
    now: Instant,
    effects: &mut Vec<EngineEffect>,
) -> DispatchResult {
    let count = state.inversions.cycle(degree, config.inversion_cycle);
    state.inversion_assign_touched = Some(now);
    log::debug!("degree {} inversion set to {}", degree, count);
    effects.push(EngineEffect::SetText(format!("Deg {} Inv {}", degree + 1, count)));
    DispatchResult::none()
}

pub(super) fn exit_inversion_mode(state: &mut EngineState, effects: &mut Vec<EngineEffect>) {
    state.inversion_assign = false;
    state.inversion_assign_touched = None;
    log::debug!("inversion assignment off");
    effects.push(EngineEffect::SetText(state.idle_text()));
}

fn show_key_when_idle(state: &EngineState, effects: &mut Vec<EngineEffect>) {
    if !state.is_sounding() && !state.inversion_assign {
        effects.push(EngineEffect::SetText(state.key_label()));
    }
}
