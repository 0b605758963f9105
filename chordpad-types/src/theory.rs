//! Scale and chord construction.
//!
//! All functions are pure and total over the fixed catalogs in [`crate::music`].

use serde::{Deserialize, Serialize};

use crate::music::{ChordType, Key, ScaleType};

/// Pitch of the scale root in its lowest octave (middle C).
pub const BASE_NOTE: i32 = 60;

/// Name reported for note lists that match no catalog signature.
pub const UNKNOWN_CHORD: &str = "Unknown";

/// Ordered list of pitches. Index 0 is the reference note for interval math.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chord(Vec<i32>);

impl Chord {
    pub fn new(notes: Vec<i32>) -> Self {
        Self(notes)
    }

    pub fn notes(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowest-indexed note, if any.
    pub fn bass(&self) -> Option<i32> {
        self.0.first().copied()
    }

    /// Display name by exact interval signature (see [`chord_name`]).
    pub fn name(&self) -> &'static str {
        chord_name(&self.0)
    }
}

/// The seven pitches of `scale` rooted at `root`, folded into the octave above [`BASE_NOTE`].
pub fn scale_notes(root: Key, scale: ScaleType) -> [i32; 7] {
    let mut notes = [0; 7];
    for (note, offset) in notes.iter_mut().zip(scale.offsets()) {
        *note = (root.semitone() + offset).rem_euclid(12) + BASE_NOTE;
    }
    notes
}

/// Diatonic chord quality on `degree` of `scale`.
///
/// # Panics
///
/// Panics if `degree > 6`. Degrees come from a validated key mapping, so an
/// out-of-range value is a programming error.
pub fn chord_type_for_degree(scale: ScaleType, degree: u8) -> ChordType {
    scale.degree_chords()[degree as usize]
}

/// Build `chord_type` on `root`, then apply `inversion`.
///
/// The first `min(inversion, len - 1)` notes are raised an octave and the
/// result is sorted ascending. Inversions past the last one saturate.
pub fn build_chord(root: i32, chord_type: ChordType, inversion: u8) -> Chord {
    let offsets = chord_type.offsets();
    let raised = (inversion as usize).min(offsets.len().saturating_sub(1));
    let mut notes: Vec<i32> = offsets
        .iter()
        .enumerate()
        .map(|(i, offset)| {
            let note = root + offset;
            if i < raised {
                note + 12
            } else {
                note
            }
        })
        .collect();
    notes.sort_unstable();
    Chord(notes)
}

// Exact interval signatures relative to the first note. Entries spanning more
// than an octave can never match a folded signature.
const CHORD_NAMES: [(&[i32], &str); 12] = [
    (&[0, 4, 7], "Maj"),
    (&[0, 3, 7], "Min"),
    (&[0, 4, 8], "Aug"),
    (&[0, 3, 6], "Dim"),
    (&[0, 5, 7], "Sus4"),
    (&[0, 2, 7], "Sus2"),
    (&[0, 4, 7, 9], "Maj6"),
    (&[0, 4, 7, 11], "Maj7"),
    (&[0, 3, 7, 10], "Min7"),
    (&[0, 4, 7, 11, 14], "Maj9"),
    (&[0, 3, 7, 10, 14], "Min9"),
    (&[0, 4, 7, 10], "Dom7"),
];

/// Name a note list by its intervals from `notes[0]`, folded into one octave.
///
/// Inversions are not canonicalized: an inverted chord usually has a
/// different signature and reports [`UNKNOWN_CHORD`]. Ninth chords fold their
/// ninth onto the second and report [`UNKNOWN_CHORD`] too.
pub fn chord_name(notes: &[i32]) -> &'static str {
    let Some(&reference) = notes.first() else {
        return UNKNOWN_CHORD;
    };
    CHORD_NAMES
        .iter()
        .find(|(signature, _)| {
            signature.len() == notes.len()
                && signature
                    .iter()
                    .zip(notes)
                    .all(|(interval, note)| (note - reference).rem_euclid(12) == *interval)
        })
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_CHORD)
}
