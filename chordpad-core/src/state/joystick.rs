//! Joystick direction classification and the direction → chord modifier table.

use std::time::Instant;

use chordpad_types::ChordType;
use serde::{Deserialize, Serialize};

/// Axis value at rest, on the normalized 0-127 scale.
pub const JOYSTICK_CENTER: i16 = 64;

/// Eight-way deflection direction. Centre is represented as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::UpRight => "up-right",
            Direction::Right => "right",
            Direction::DownRight => "down-right",
            Direction::Down => "down",
            Direction::DownLeft => "down-left",
            Direction::Left => "left",
            Direction::UpLeft => "up-left",
        }
    }
}

/// Classify a normalized sample. Each axis counts as deflected once it is
/// more than `deadzone` away from [`JOYSTICK_CENTER`].
pub fn classify(x: u8, y: u8, deadzone: u8) -> Option<Direction> {
    let dx = x as i16 - JOYSTICK_CENTER;
    let dy = y as i16 - JOYSTICK_CENTER;
    let deadzone = deadzone as i16;
    let horizontal = if dx > deadzone {
        1
    } else if dx < -deadzone {
        -1
    } else {
        0
    };
    let vertical = if dy > deadzone {
        1
    } else if dy < -deadzone {
        -1
    } else {
        0
    };
    match (horizontal, vertical) {
        (0, 1) => Some(Direction::Up),
        (1, 1) => Some(Direction::UpRight),
        (1, 0) => Some(Direction::Right),
        (1, -1) => Some(Direction::DownRight),
        (0, -1) => Some(Direction::Down),
        (-1, -1) => Some(Direction::DownLeft),
        (-1, 0) => Some(Direction::Left),
        (-1, 1) => Some(Direction::UpLeft),
        _ => None,
    }
}

/// How a deflection changes the sounding chord's quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordModifier {
    /// Swap between the major and minor family.
    ToggleThird,
    /// Replace with a fixed chord type.
    Set(ChordType),
    /// Seventh matching the current third.
    Seventh,
    /// Ninth matching the current third.
    Ninth,
}

impl ChordModifier {
    /// Resolve against the sounding chord type.
    pub fn apply(&self, current: ChordType) -> ChordType {
        match self {
            ChordModifier::ToggleThird => match current {
                ChordType::Major => ChordType::Minor,
                ChordType::Minor => ChordType::Major,
                ChordType::Major7 => ChordType::Minor7,
                ChordType::Minor7 => ChordType::Major7,
                ChordType::Major9 => ChordType::Minor9,
                ChordType::Minor9 => ChordType::Major9,
                ChordType::Dominant7 => ChordType::Minor7,
                ChordType::Diminished => ChordType::Major,
                ChordType::Augmented
                | ChordType::Sus2
                | ChordType::Sus4
                | ChordType::Major6 => ChordType::Minor,
            },
            ChordModifier::Set(chord_type) => *chord_type,
            ChordModifier::Seventh => {
                if current.has_minor_third() {
                    ChordType::Minor7
                } else {
                    ChordType::Major7
                }
            }
            ChordModifier::Ninth => {
                if current.has_minor_third() {
                    ChordType::Minor9
                } else {
                    ChordType::Major9
                }
            }
        }
    }
}

/// Fixed direction → modifier table, indexed in [`Direction::ALL`] order.
pub const DIRECTION_MODIFIERS: [ChordModifier; 8] = [
    ChordModifier::ToggleThird,
    ChordModifier::Set(ChordType::Dominant7),
    ChordModifier::Set(ChordType::Sus4),
    ChordModifier::Set(ChordType::Major6),
    ChordModifier::Seventh,
    ChordModifier::Ninth,
    ChordModifier::Set(ChordType::Sus2),
    ChordModifier::Set(ChordType::Augmented),
];

pub fn modifier_for(direction: Direction) -> ChordModifier {
    DIRECTION_MODIFIERS[direction as usize]
}

/// Deflection history used for debouncing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoystickState {
    /// Direction that last fired, while it is still held. Cleared at centre.
    pub latched: Option<Direction>,
    /// Most recent sample's direction.
    pub last_direction: Option<Direction>,
    pub last_accepted_at: Option<Instant>,
}
