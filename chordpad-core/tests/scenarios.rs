mod common;

use std::time::Duration;

use chordpad_core::dispatch::EngineEffect;
use chordpad_core::io::OutputOp;
use chordpad_core::state::EngineConfig;
use chordpad_types::{ChordType, Key, ScaleType};
use common::{degree_key, Harness, INVERSION_KEY, RELOAD_KEY, ROOT_KEY, SCALE_KEY, UNMAPPED_KEY};

#[test]
fn test_degree_zero_in_c_major() {
    let mut h = Harness::new();
    let result = h.press(degree_key(0));
    assert!(result.chord_changed);
    assert_eq!(h.held(), vec![60, 64, 67]);
    assert_eq!(h.display.current(), "Maj");
}

#[test]
fn test_first_inversion_raises_bass() {
    let mut h = Harness::new();
    h.state.inversions.cycle(0, h.config.inversion_cycle);
    h.press(degree_key(0));
    assert_eq!(h.output.note_ons(), vec![64, 67, 72]);
    assert_eq!(h.display.current(), "Unknown");
}

#[test]
fn test_joystick_up_makes_minor() {
    let mut h = Harness::new();
    h.press(degree_key(0));
    h.stick(64, 127, 20);
    assert_eq!(h.held(), vec![60, 63, 67]);
    assert_eq!(h.display.current(), "Min");
    assert_eq!(h.state.sounding.as_ref().unwrap().chord_type, ChordType::Minor);
}

#[test]
fn test_scale_cycle_returns_home() {
    let mut h = Harness::new();
    for _ in 0..ScaleType::ALL.len() {
        h.press(SCALE_KEY);
    }
    assert_eq!(ScaleType::ALL.len(), 9);
    assert_eq!(h.state.scale, ScaleType::Major);
    assert_eq!(h.display.current(), "C Major");
}

#[test]
fn test_inversion_assignment_then_play() {
    let mut h = Harness::new();
    h.press(INVERSION_KEY);
    assert_eq!(h.display.current(), "Inv mode");
    for expected in 1..=3 {
        h.press(degree_key(2));
        h.release(degree_key(2));
        assert_eq!(h.display.current(), format!("Deg 3 Inv {}", expected));
    }
    assert!(h.output.operations().is_empty(), "assignment is silent");
    h.press(INVERSION_KEY);
    assert!(!h.state.inversion_assign);

    h.press(degree_key(2));
    assert_eq!(h.state.inversions.get(2), 3);
    // E minor with both lower notes raised
    assert_eq!(h.output.note_ons(), vec![71, 76, 79]);
}

#[test]
fn test_inversion_count_wraps() {
    let mut h = Harness::new();
    h.press(INVERSION_KEY);
    for _ in 0..5 {
        h.press(degree_key(4));
    }
    assert_eq!(h.state.inversions.get(4), 1);
    assert_eq!(h.display.current(), "Deg 5 Inv 1");
}

#[test]
fn test_repeated_press_never_overlaps() {
    let mut h = Harness::new();
    h.press(degree_key(0));
    h.press(degree_key(0));
    h.press(degree_key(3));
    let ops = h.output.operations();
    assert_eq!(ops.len(), 3 + 3 + 3 + 3 + 3);
    // Second press: three offs before three ons
    assert!(ops[3..6].iter().all(|op| matches!(op, OutputOp::NoteOff { .. })));
    assert!(ops[6..9].iter().all(|op| matches!(op, OutputOp::NoteOn { .. })));
    assert!(ops[9..12].iter().all(|op| matches!(op, OutputOp::NoteOff { .. })));
    // F major
    assert_eq!(h.held(), vec![65, 69, 72]);
}

#[test]
fn test_release_silences_everything() {
    let mut h = Harness::new();
    h.press(degree_key(5));
    h.stick(0, 64, 20);
    h.release(degree_key(5));
    assert!(h.held().is_empty());
    assert_eq!(h.display.current(), "");
    assert!(!h.state.is_sounding());
}

#[test]
fn test_joystick_debounce_within_grace() {
    let mut h = Harness::new();
    h.press(degree_key(0));
    h.stick(64, 127, 10);
    h.center(10);
    h.stick(64, 127, 10);
    h.center(10);
    h.stick(64, 127, 10);
    // One transition: major -> minor
    assert_eq!(h.output.note_ons(), vec![60, 64, 67, 60, 63, 67]);
}

#[test]
fn test_joystick_held_toggle_repeats_after_grace() {
    let mut h = Harness::new();
    h.press(degree_key(0));
    h.stick(64, 127, 10);
    assert_eq!(h.state.sounding.as_ref().unwrap().chord_type, ChordType::Minor);
    h.step(100);
    assert_eq!(h.output.note_ons().len(), 6);

    // Still held a second later: the toggle fires again
    h.step(1000);
    assert_eq!(h.state.sounding.as_ref().unwrap().chord_type, ChordType::Major);
    assert_eq!(h.held(), vec![60, 64, 67]);
    assert_eq!(h.output.note_ons().len(), 9);
}

#[test]
fn test_joystick_held_fixed_type_settles() {
    let mut h = Harness::new();
    h.press(degree_key(0));
    h.input.set_axes(127, 64);
    for _ in 0..50 {
        h.step(100);
    }
    assert_eq!(h.state.sounding.as_ref().unwrap().chord_type, ChordType::Sus4);
    assert_eq!(h.output.note_ons().len(), 6);
}

#[test]
fn test_joystick_without_chord_is_ignored() {
    let mut h = Harness::new();
    h.stick(64, 0, 500);
    h.stick(127, 127, 500);
    assert!(h.output.operations().is_empty());
    assert!(h.display.history().is_empty());
}

#[test]
fn test_joystick_inside_deadzone_is_center() {
    let mut h = Harness::new();
    h.press(degree_key(0));
    // 64 + 36 is on the deadzone edge
    h.stick(100, 100, 500);
    h.stick(28, 28, 500);
    assert_eq!(h.output.note_ons().len(), 3);
}

#[test]
fn test_seventh_and_ninth_extensions() {
    let mut h = Harness::new();
    h.press(degree_key(1));
    h.stick(64, 0, 20);
    assert_eq!(h.state.sounding.as_ref().unwrap().chord_type, ChordType::Minor7);
    assert_eq!(h.display.current(), "Min7");
    h.center(400);
    h.stick(0, 0, 400);
    assert_eq!(h.state.sounding.as_ref().unwrap().chord_type, ChordType::Minor9);
    assert_eq!(h.held(), vec![62, 65, 69, 72, 76]);
}

#[test]
fn test_root_advance_transposes_next_chord() {
    let mut h = Harness::new();
    for _ in 0..7 {
        h.press(ROOT_KEY);
    }
    assert_eq!(h.state.root, Key::G);
    assert_eq!(h.display.current(), "G Major");
    h.press(degree_key(0));
    assert_eq!(h.held(), vec![67, 71, 74]);
}

#[test]
fn test_minor_scale_degree_chords() {
    let mut h = Harness::new();
    h.state.scale = ScaleType::NaturalMinor;
    h.press(degree_key(0));
    assert_eq!(h.held(), vec![60, 63, 67]);
    h.press(degree_key(1));
    assert_eq!(h.display.current(), "Dim");
    h.press(degree_key(2));
    assert_eq!(h.held(), vec![63, 67, 70]);
}

#[test]
fn test_reload_stops_and_is_reported() {
    let mut h = Harness::new();
    h.press(degree_key(0));
    let result = h.press(RELOAD_KEY);
    assert!(result.reload);
    assert_eq!(h.reloads, 1);
    assert!(h.held().is_empty());
    assert_eq!(h.effects.last(), Some(&EngineEffect::Reload));
}

#[test]
fn test_unmapped_key_changes_nothing() {
    let mut h = Harness::new();
    let before = h.state.clone();
    h.press(UNMAPPED_KEY);
    h.release(UNMAPPED_KEY);
    assert_eq!(h.state, before);
    assert!(h.effects.is_empty());
}

#[test]
fn test_inversion_mode_expires_after_timeout() {
    let mut h = Harness::with_config(EngineConfig {
        inversion_mode_timeout: Some(Duration::from_secs(2)),
        ..EngineConfig::default()
    });
    h.press(INVERSION_KEY);
    h.press(degree_key(0));
    h.step(1_500);
    assert!(h.state.inversion_assign, "still inside the timeout");
    h.step(600);
    assert!(!h.state.inversion_assign);

    h.press(degree_key(0));
    assert_eq!(h.output.note_ons(), vec![64, 67, 72]);
}

#[test]
fn test_queued_keys_are_one_per_tick() {
    let mut h = Harness::new();
    h.input.press(ROOT_KEY).press(ROOT_KEY).press(ROOT_KEY);
    h.step(10);
    assert_eq!(h.state.root, Key::Cs);
    h.drain(10);
    assert_eq!(h.state.root, Key::Ds);
}
