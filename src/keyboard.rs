//! German keyboard layout
//!
//! Rows, the split between the two hands, and which finger types each key.

/// Upper-case key rows; the last row is the space bar
pub const LAYOUT: [&[char]; 5] = [
    &['1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'ß'],
    &['Q', 'W', 'E', 'R', 'T', 'Z', 'U', 'I', 'O', 'P', 'Ü'],
    &['A', 'S', 'D', 'F', 'G', 'H', 'J', 'K', 'L', 'Ö', 'Ä'],
    &['Y', 'X', 'C', 'V', 'B', 'N', 'M', ',', '.'],
    &[' '],
];

/// Index where each letter row splits into left and right hand (6|7, T|Z, G|H, B|N)
pub const SPLIT_POINTS: [usize; 4] = [6, 5, 5, 5];

/// Horizontal stagger per row, in cells
pub const ROW_OFFSETS: [i16; 4] = [0, -3, -1, 2];

pub const HOME_ROW: [char; 11] = ['A', 'S', 'D', 'F', 'G', 'H', 'J', 'K', 'L', 'Ö', 'Ä'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    /// kleiner Finger
    Pinky,
    /// Ringfinger
    Ring,
    /// Mittelfinger
    Middle,
    /// Zeigefinger
    Index,
}

impl Finger {
    /// Guide colour as RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Finger::Pinky => (0xFF, 0x6B, 0x6B),
            Finger::Ring => (0x4E, 0xCD, 0xC4),
            Finger::Middle => (0xFF, 0xD1, 0x66),
            Finger::Index => (0x1B, 0x98, 0xE0),
        }
    }

    pub fn german_name(&self) -> &'static str {
        match self {
            Finger::Pinky => "kleiner",
            Finger::Ring => "ring",
            Finger::Middle => "mittel",
            Finger::Index => "zeige",
        }
    }
}

/// Finger responsible for `key`. Unknown keys default to the pinky.
pub fn finger_for(key: char) -> Finger {
    match fold_case(key) {
        '2' | '9' | 'W' | 'O' | 'S' | 'L' | 'X' => Finger::Ring,
        '3' | '8' | 'E' | 'I' | 'D' | 'K' | 'C' => Finger::Middle,
        '4' | '5' | '6' | '7' | 'R' | 'T' | 'Z' | 'U' | 'F' | 'G' | 'H' | 'J' | 'V' | 'B'
        | 'N' | 'M' | ' ' => Finger::Index,
        _ => Finger::Pinky,
    }
}

pub fn is_home_row(key: char) -> bool {
    HOME_ROW.contains(&fold_case(key))
}

/// Upper-case a key the way the keyboard labels it.
///
/// `ß` has no single-char capital and stays as is.
pub fn fold_case(c: char) -> char {
    if c == 'ß' {
        return c;
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Left and right halves of a letter row
pub fn split_row(row: usize) -> Option<(&'static [char], &'static [char])> {
    let keys = LAYOUT.get(row)?;
    let split = *SPLIT_POINTS.get(row)?;
    Some(keys.split_at(split.min(keys.len())))
}
