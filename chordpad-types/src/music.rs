use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Musical key (pitch class)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::C,
        Key::Cs,
        Key::D,
        Key::Ds,
        Key::E,
        Key::F,
        Key::Fs,
        Key::G,
        Key::Gs,
        Key::A,
        Key::As,
        Key::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Key::C => "C",
            Key::Cs => "C#",
            Key::D => "D",
            Key::Ds => "D#",
            Key::E => "E",
            Key::F => "F",
            Key::Fs => "F#",
            Key::G => "G",
            Key::Gs => "G#",
            Key::A => "A",
            Key::As => "A#",
            Key::B => "B",
        }
    }

    /// Chromatic index 0-11, C = 0
    pub fn semitone(&self) -> i32 {
        *self as i32
    }

    /// Key for a chromatic index, wrapping mod 12.
    pub fn from_index(index: i32) -> Key {
        Key::ALL[index.rem_euclid(12) as usize]
    }

    pub fn next(&self) -> Key {
        Key::from_index(self.semitone() + 1)
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::C
    }
}

impl FromStr for Key {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(Key::C),
            "C#" | "Cs" | "Db" => Ok(Key::Cs),
            "D" => Ok(Key::D),
            "D#" | "Ds" | "Eb" => Ok(Key::Ds),
            "E" => Ok(Key::E),
            "F" => Ok(Key::F),
            "F#" | "Fs" | "Gb" => Ok(Key::Fs),
            "G" => Ok(Key::G),
            "G#" | "Gs" | "Ab" => Ok(Key::Gs),
            "A" => Ok(Key::A),
            "A#" | "As" | "Bb" => Ok(Key::As),
            "B" => Ok(Key::B),
            _ => Err(TheoryError::UnknownKey(s.to_string())),
        }
    }
}

/// Diatonic scale: seven ascending semitone offsets from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleType {
    Major,
    NaturalMinor,
    HarmonicMinor,
    MelodicMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
}

impl ScaleType {
    /// Catalog order; `next()` cycles through it.
    pub const ALL: [ScaleType; 9] = [
        ScaleType::Major,
        ScaleType::NaturalMinor,
        ScaleType::HarmonicMinor,
        ScaleType::MelodicMinor,
        ScaleType::Dorian,
        ScaleType::Phrygian,
        ScaleType::Lydian,
        ScaleType::Mixolydian,
        ScaleType::Locrian,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::NaturalMinor => "Minor",
            ScaleType::HarmonicMinor => "Harmonic Minor",
            ScaleType::MelodicMinor => "Melodic Minor",
            ScaleType::Dorian => "Dorian",
            ScaleType::Phrygian => "Phrygian",
            ScaleType::Lydian => "Lydian",
            ScaleType::Mixolydian => "Mixolydian",
            ScaleType::Locrian => "Locrian",
        }
    }

    /// Identifier used in config files.
    pub fn id(&self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::NaturalMinor => "minor",
            ScaleType::HarmonicMinor => "harmonic_minor",
            ScaleType::MelodicMinor => "melodic_minor",
            ScaleType::Dorian => "dorian",
            ScaleType::Phrygian => "phrygian",
            ScaleType::Lydian => "lydian",
            ScaleType::Mixolydian => "mixolydian",
            ScaleType::Locrian => "locrian",
        }
    }

    /// Semitone offsets from the root, one per degree.
    pub fn offsets(&self) -> &'static [i32; 7] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleType::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleType::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            ScaleType::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            ScaleType::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            ScaleType::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            ScaleType::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            ScaleType::Locrian => &[0, 1, 3, 5, 6, 8, 10],
        }
    }

    /// Chord quality built on each degree of this scale.
    pub fn degree_chords(&self) -> &'static [ChordType; 7] {
        use crate::music::ChordType::{Augmented as Aug, Diminished as Dim, Major as Maj, Minor as Min};
        match self {
            ScaleType::Major => &[Maj, Min, Min, Maj, Maj, Min, Dim],
            ScaleType::NaturalMinor => &[Min, Dim, Maj, Min, Min, Maj, Maj],
            ScaleType::HarmonicMinor => &[Min, Dim, Aug, Min, Maj, Maj, Dim],
            ScaleType::MelodicMinor => &[Min, Min, Aug, Maj, Maj, Dim, Dim],
            ScaleType::Dorian => &[Min, Min, Maj, Maj, Min, Dim, Maj],
            ScaleType::Phrygian => &[Min, Maj, Maj, Min, Min, Maj, Dim],
            ScaleType::Lydian => &[Maj, Maj, Min, Dim, Maj, Min, Min],
            ScaleType::Mixolydian => &[Maj, Min, Dim, Maj, Min, Min, Maj],
            ScaleType::Locrian => &[Dim, Maj, Min, Min, Maj, Maj, Min],
        }
    }

    pub fn next(&self) -> ScaleType {
        let index = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl Default for ScaleType {
    fn default() -> Self {
        ScaleType::Major
    }
}

impl FromStr for ScaleType {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScaleType::ALL
            .iter()
            .copied()
            .find(|scale| scale.id() == s || scale.name() == s)
            .ok_or_else(|| TheoryError::UnknownScaleType(s.to_string()))
    }
}

/// Named chord interval pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordType {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Dominant7,
    Major7,
    Minor7,
    Major6,
    Major9,
    Minor9,
}

impl ChordType {
    pub const ALL: [ChordType; 12] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Diminished,
        ChordType::Augmented,
        ChordType::Sus2,
        ChordType::Sus4,
        ChordType::Dominant7,
        ChordType::Major7,
        ChordType::Minor7,
        ChordType::Major6,
        ChordType::Major9,
        ChordType::Minor9,
    ];

    /// Semitone offsets from the un-inverted root. Strictly ascending, first is 0.
    pub fn offsets(&self) -> &'static [i32] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Diminished => &[0, 3, 6],
            ChordType::Augmented => &[0, 4, 8],
            ChordType::Sus2 => &[0, 2, 7],
            ChordType::Sus4 => &[0, 5, 7],
            ChordType::Dominant7 => &[0, 4, 7, 10],
            ChordType::Major7 => &[0, 4, 7, 11],
            ChordType::Minor7 => &[0, 3, 7, 10],
            ChordType::Major6 => &[0, 4, 7, 9],
            ChordType::Major9 => &[0, 4, 7, 11, 14],
            ChordType::Minor9 => &[0, 3, 7, 10, 14],
        }
    }

    /// Display name, as shown on the controller's screen.
    pub fn name(&self) -> &'static str {
        match self {
            ChordType::Major => "Maj",
            ChordType::Minor => "Min",
            ChordType::Diminished => "Dim",
            ChordType::Augmented => "Aug",
            ChordType::Sus2 => "Sus2",
            ChordType::Sus4 => "Sus4",
            ChordType::Dominant7 => "Dom7",
            ChordType::Major7 => "Maj7",
            ChordType::Minor7 => "Min7",
            ChordType::Major6 => "Maj6",
            ChordType::Major9 => "Maj9",
            ChordType::Minor9 => "Min9",
        }
    }

    /// Identifier used in config files.
    pub fn id(&self) -> &'static str {
        match self {
            ChordType::Major => "major",
            ChordType::Minor => "minor",
            ChordType::Diminished => "diminished",
            ChordType::Augmented => "augmented",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
            ChordType::Dominant7 => "dominant7",
            ChordType::Major7 => "maj7",
            ChordType::Minor7 => "min7",
            ChordType::Major6 => "maj6",
            ChordType::Major9 => "maj9",
            ChordType::Minor9 => "min9",
        }
    }

    pub fn has_minor_third(&self) -> bool {
        self.offsets().contains(&3)
    }
}

impl FromStr for ChordType {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "7th" is the older spelling of the dominant seventh
        if s == "7th" {
            return Ok(ChordType::Dominant7);
        }
        ChordType::ALL
            .iter()
            .copied()
            .find(|chord| chord.id() == s || chord.name() == s)
            .ok_or_else(|| TheoryError::UnknownChordType(s.to_string()))
    }
}

/// A name did not match any entry in the fixed catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TheoryError {
    UnknownKey(String),
    UnknownScaleType(String),
    UnknownChordType(String),
}

impl fmt::Display for TheoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(s) => write!(f, "unknown key: {:?}", s),
            Self::UnknownScaleType(s) => write!(f, "unknown scale type: {:?}", s),
            Self::UnknownChordType(s) => write!(f, "unknown chord type: {:?}", s),
        }
    }
}

impl std::error::Error for TheoryError {}
