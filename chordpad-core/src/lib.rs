//! # chordpad-core
//!
//! Engine for the chordpad controller: a 12-key matrix keypad picks scale
//! degrees, a two-axis joystick recolours the sounding chord, and the result
//! goes out as MIDI notes with a short text readout. Independent of any
//! terminal or hardware backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chordpad_core::config::Config;
//! use chordpad_core::dispatch::{apply_effects, tick};
//! use chordpad_core::midi::MidiOutputManager;
//! use chordpad_core::state::EngineState;
//!
//! let config = Config::load();
//! let engine_config = config.engine_config();
//! let (key, scale) = config.defaults();
//! let mut state = EngineState::with_defaults(key, scale);
//! let mut midi = MidiOutputManager::new();
//!
//! loop {
//!     let mut effects = Vec::new();
//!     tick(&mut input, &mut state, &engine_config, Instant::now(), &mut effects);
//!     if apply_effects(effects, &engine_config, &mut midi, &mut display) {
//!         // reload requested
//!     }
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`action`]: `KeyEvent`, `EngineInput`, `DispatchResult`
//! - [`state`]: `EngineState`, `EngineConfig`, keypad map, joystick classification
//! - [`dispatch`]: `dispatch_input()` and `tick()`, the only mutators of `EngineState`;
//!   effects are applied afterwards with `apply_effects()`
//! - [`io`]: input/output/display traits plus recording doubles for tests
//! - [`midi`]: `MidiOutputManager` over midir
//! - [`config`]: TOML configuration (embedded defaults + user override)
//! - [`event_log`]: JSONL event log and replay

pub mod action;
pub mod config;
pub mod dispatch;
pub mod event_log;
pub mod io;
pub mod midi;
pub mod state;

pub use chordpad_types as types;
