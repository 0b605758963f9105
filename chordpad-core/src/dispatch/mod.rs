mod helpers;
mod joystick;
mod keypad;
pub mod side_effects;

pub use side_effects::{apply_effects, EngineEffect};

use std::time::Instant;

use crate::action::{DispatchResult, EngineInput};
use crate::io::InputSource;
use crate::state::{EngineConfig, EngineState};

/// Advance the state machine by one input. The single entry point for mutating `EngineState`.
///
/// Output and display operations are pushed to `effects` in the order they
/// must be applied; see [`apply_effects`].
pub fn dispatch_input(
    input: &EngineInput,
    state: &mut EngineState,
    config: &EngineConfig,
    now: Instant,
    effects: &mut Vec<EngineEffect>,
) -> DispatchResult {
    match input {
        EngineInput::Key(event) => {
            let mut result = keypad::dispatch_key(event, state, config, now, effects);
            result.key_events.push(*event);
            result
        }
        EngineInput::Axes { x, y } => joystick::dispatch_axes(*x, *y, state, config, now, effects),
    }
}

/// One scheduler step: at most one key event, one axis sample, then timeouts.
pub fn tick<I: InputSource + ?Sized>(
    input: &mut I,
    state: &mut EngineState,
    config: &EngineConfig,
    now: Instant,
    effects: &mut Vec<EngineEffect>,
) -> DispatchResult {
    let mut result = DispatchResult::none();
    if let Some(event) = input.poll_key_event() {
        result.merge(dispatch_input(&EngineInput::Key(event), state, config, now, effects));
    }
    let (x, y) = input.sample_axes();
    result.merge(dispatch_input(&EngineInput::Axes { x, y }, state, config, now, effects));
    expire_inversion_mode(state, config, now, effects);
    result
}

/// Leave the inversion-assign sub-mode if it has been idle past the configured timeout.
/// Returns true if it was exited.
pub fn expire_inversion_mode(
    state: &mut EngineState,
    config: &EngineConfig,
    now: Instant,
    effects: &mut Vec<EngineEffect>,
) -> bool {
    if !state.inversion_assign {
        return false;
    }
    let (Some(timeout), Some(touched)) = (config.inversion_mode_timeout, state.inversion_assign_touched)
    else {
        return false;
    };
    if now.saturating_duration_since(touched) < timeout {
        return false;
    }
    log::info!("inversion assignment timed out after {:?}", timeout);
    keypad::exit_inversion_mode(state, effects);
    true
}
