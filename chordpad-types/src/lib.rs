//! # chordpad-types
//!
//! Shared music-theory definitions for the chordpad controller.
//! Everything here is pure: fixed catalogs of keys, scales and chord types,
//! plus the functions that turn a scale degree into sounding notes.

pub mod music;
pub mod theory;

pub use music::{ChordType, Key, ScaleType, TheoryError};
pub use theory::{
    build_chord, chord_name, chord_type_for_degree, scale_notes, Chord, BASE_NOTE, UNKNOWN_CHORD,
};
