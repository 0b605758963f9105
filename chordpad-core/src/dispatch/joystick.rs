use std::time::Instant;

use crate::action::DispatchResult;
use crate::state::{classify, modifier_for, EngineConfig, EngineState};

use super::helpers::replace_sounding;
use super::EngineEffect;

/// Evaluate one joystick sample.
///
/// Fires only while a chord sounds and once the grace period since the last
/// accepted transition has passed. A held deflection fires again each time
/// the grace period runs out. Centre clears the latch.
pub(super) fn dispatch_axes(
    x: u8,
    y: u8,
    state: &mut EngineState,
    config: &EngineConfig,
    now: Instant,
    effects: &mut Vec<EngineEffect>,
) -> DispatchResult {
    let direction = classify(x, y, config.deadzone);
    state.joystick.last_direction = direction;

    let Some(direction) = direction else {
        state.joystick.latched = None;
        return DispatchResult::none();
    };
    let Some(sounding) = state.sounding.as_ref() else {
        return DispatchResult::none();
    };
    if let Some(accepted_at) = state.joystick.last_accepted_at {
        if now.saturating_duration_since(accepted_at) <= config.grace_period {
            return DispatchResult::none();
        }
    }

    let current = sounding.chord_type;
    let root = sounding.root;
    let target = modifier_for(direction).apply(current);
    if target == current {
        return DispatchResult::none();
    }

    let held = state.joystick.latched == Some(direction);
    log::debug!(
        "joystick {}{}: {:?} -> {:?}",
        direction.name(),
        if held { " (held)" } else { "" },
        current,
        target
    );
    if !replace_sounding(state, root, target, 0, effects) {
        return DispatchResult::none();
    }
    state.joystick.latched = Some(direction);
    state.joystick.last_accepted_at = Some(now);
    DispatchResult::with_chord_change()
}
