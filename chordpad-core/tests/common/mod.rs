#![allow(dead_code)]
//! Test harness for chordpad-core integration tests.

use std::time::{Duration, Instant};

use chordpad_core::action::DispatchResult;
use chordpad_core::dispatch::{apply_effects, tick, EngineEffect};
use chordpad_core::io::{RecordingDisplay, RecordingOutput, ScriptedInput};
use chordpad_core::state::{EngineConfig, EngineState};

/// Stock keypad positions.
pub const ROOT_KEY: u8 = 0;
pub const SCALE_KEY: u8 = 1;
pub const RELOAD_KEY: u8 = 2;
pub const INVERSION_KEY: u8 = 3;
pub const UNMAPPED_KEY: u8 = 7;

/// Stock keypad position for a zero-based scale degree.
pub fn degree_key(degree: u8) -> u8 {
    match degree {
        0 => 8,
        1 => 4,
        2 => 9,
        3 => 5,
        4 => 10,
        5 => 6,
        6 => 11,
        _ => panic!("no key for degree {}", degree),
    }
}

/// Engine wired to scripted input and recording output, with a manual clock.
pub struct Harness {
    pub state: EngineState,
    pub config: EngineConfig,
    pub input: ScriptedInput,
    pub output: RecordingOutput,
    pub display: RecordingDisplay,
    pub now: Instant,
    pub effects: Vec<EngineEffect>,
    pub reloads: usize,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            state: EngineState::new(),
            config,
            input: ScriptedInput::new(),
            output: RecordingOutput::new(),
            display: RecordingDisplay::new(),
            now: Instant::now(),
            effects: Vec::new(),
            reloads: 0,
        }
    }

    /// Advance the clock by `ms` and run one scheduler step.
    pub fn step(&mut self, ms: u64) -> DispatchResult {
        self.now += Duration::from_millis(ms);
        let mut effects = Vec::new();
        let result = tick(&mut self.input, &mut self.state, &self.config, self.now, &mut effects);
        self.effects.extend(effects.iter().cloned());
        if apply_effects(effects, &self.config, &mut self.output, &mut self.display) {
            self.reloads += 1;
        }
        result
    }

    /// Step until every queued key event has been consumed.
    pub fn drain(&mut self, ms_per_step: u64) {
        while self.input.pending() > 0 {
            self.step(ms_per_step);
        }
    }

    pub fn press(&mut self, key: u8) -> DispatchResult {
        self.input.press(key);
        self.step(10)
    }

    pub fn release(&mut self, key: u8) -> DispatchResult {
        self.input.release(key);
        self.step(10)
    }

    pub fn stick(&mut self, x: u8, y: u8, ms: u64) -> DispatchResult {
        self.input.set_axes(x, y);
        self.step(ms)
    }

    pub fn center(&mut self, ms: u64) -> DispatchResult {
        self.input.center();
        self.step(ms)
    }

    /// Notes currently held on the output, sorted.
    pub fn held(&self) -> Vec<i32> {
        let mut held = self.output.held();
        held.sort_unstable();
        held
    }
}
