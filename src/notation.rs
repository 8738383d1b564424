//! Shared pitch, duration and clef tables
//!
//! These tables are the single source of truth for pitch frequencies and
//! staff-position mappings; every stage of the pipeline resolves notes
//! through them.

use crate::analysis::StaffLine;
use serde::{Deserialize, Serialize};

/// Lowest piano frequency in Hz (A0)
pub const MIN_PIANO_HZ: f64 = 27.5;
/// Highest piano frequency in Hz (C8)
pub const MAX_PIANO_HZ: f64 = 4186.01;

/// Frequencies of the 88 piano notes, A0 to C8
pub const PIANO_NOTES: [(&str, f64); 88] = [
    ("A0", 27.5),
    ("A#0", 29.14),
    ("B0", 30.87),
    ("C1", 32.70),
    ("C#1", 34.65),
    ("D1", 36.71),
    ("D#1", 38.89),
    ("E1", 41.20),
    ("F1", 43.65),
    ("F#1", 46.25),
    ("G1", 49.00),
    ("G#1", 51.96),
    ("A1", 55.00),
    ("A#1", 58.27),
    ("B1", 61.74),
    ("C2", 65.41),
    ("C#2", 69.30),
    ("D2", 73.42),
    ("D#2", 77.78),
    ("E2", 82.41),
    ("F2", 87.31),
    ("F#2", 92.50),
    ("G2", 98.00),
    ("G#2", 103.83),
    ("A2", 110.00),
    ("A#2", 116.54),
    ("B2", 123.47),
    ("C3", 130.81),
    ("C#3", 138.59),
    ("D3", 146.83),
    ("D#3", 155.56),
    ("E3", 164.81),
    ("F3", 174.61),
    ("F#3", 185.00),
    ("G3", 196.00),
    ("G#3", 207.65),
    ("A3", 220.00),
    ("A#3", 233.08),
    ("B3", 246.94),
    ("C4", 261.63),
    ("C#4", 277.18),
    ("D4", 293.66),
    ("D#4", 311.13),
    ("E4", 329.63),
    ("F4", 349.23),
    ("F#4", 369.99),
    ("G4", 392.00),
    ("G#4", 415.30),
    ("A4", 440.00),
    ("A#4", 466.16),
    ("B4", 493.88),
    ("C5", 523.25),
    ("C#5", 554.37),
    ("D5", 587.33),
    ("D#5", 622.25),
    ("E5", 659.25),
    ("F5", 698.46),
    ("F#5", 739.99),
    ("G5", 784.00),
    ("G#5", 830.61),
    ("A5", 880.00),
    ("A#5", 932.33),
    ("B5", 987.77),
    ("C6", 1046.50),
    ("C#6", 1108.73),
    ("D6", 1174.66),
    ("D#6", 1244.51),
    ("E6", 1318.51),
    ("F6", 1396.91),
    ("F#6", 1479.98),
    ("G6", 1568.00),
    ("G#6", 1661.22),
    ("A6", 1760.00),
    ("A#6", 1864.66),
    ("B6", 1975.53),
    ("C7", 2093.00),
    ("C#7", 2217.46),
    ("D7", 2349.32),
    ("D#7", 2489.02),
    ("E7", 2637.02),
    ("F7", 2793.83),
    ("F#7", 2959.96),
    ("G7", 3136.00),
    ("G#7", 3322.44),
    ("A7", 3520.00),
    ("A#7", 3729.31),
    ("B7", 3951.07),
    ("C8", 4186.01),
];

/// Look up the fixed frequency of a note name like "A4" or "C#3"
pub fn frequency(name: &str) -> Option<f64> {
    PIANO_NOTES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, hz)| *hz)
}

/// MIDI key number for a note letter (+ optional sharp) and octave, C4 = 60
pub fn midi_key(note: &str, octave: u8) -> Option<u8> {
    let mut chars = note.chars();
    let letter = chars.next()?;
    let sharp = match chars.next() {
        None => 0u8,
        Some('#') => 1,
        Some(_) => return None,
    };
    let semitone = match letter {
        'C' => 0u8,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let key = (octave as u16 + 1) * 12 + (semitone + sharp) as u16;
    u8::try_from(key).ok().filter(|k| *k <= 127)
}

/// Canonical note duration values in milliseconds at 120 BPM.
///
/// Covers semibreve down to semifusa; rests share the same values.
pub const CANONICAL_DURATIONS_MS: [f64; 7] = [2000.0, 1000.0, 500.0, 250.0, 125.0, 62.5, 31.25];

/// Whether a duration is one of the canonical values
pub fn is_canonical_duration(ms: f64) -> bool {
    CANONICAL_DURATIONS_MS.iter().any(|d| *d == ms)
}

/// Rhythmic duration classes assigned by the note-head classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    Semibreve,
    Minima,
    Seminima,
    Colcheia,
    Semicolcheia,
}

impl DurationType {
    /// Duration in milliseconds at 120 BPM
    pub fn ms(&self) -> f64 {
        match self {
            DurationType::Semibreve => 2000.0,
            DurationType::Minima => 1000.0,
            DurationType::Seminima => 500.0,
            DurationType::Colcheia => 250.0,
            DurationType::Semicolcheia => 125.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DurationType::Semibreve => "semibreve",
            DurationType::Minima => "minima",
            DurationType::Seminima => "seminima",
            DurationType::Colcheia => "colcheia",
            DurationType::Semicolcheia => "semicolcheia",
        }
    }
}

/// Supported clefs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
    Alto,
}

/// Pitch names a clef assigns to staff positions.
///
/// Lines and spaces run bottom-to-top; ledger sequences run outward from
/// the staff.
pub struct ClefPositions {
    pub name: &'static str,
    pub lines: [&'static str; 5],
    pub spaces: [&'static str; 4],
    pub ledger_above: &'static [&'static str],
    pub ledger_below: &'static [&'static str],
}

const TREBLE_POSITIONS: ClefPositions = ClefPositions {
    name: "treble",
    lines: ["E4", "G4", "B4", "D5", "F5"],
    spaces: ["F4", "A4", "C5", "E5"],
    ledger_above: &["G5", "A5", "B5", "C6", "D6", "E6", "F6"],
    ledger_below: &["D4", "C4", "B3", "A3", "G3", "F3", "E3"],
};

const BASS_POSITIONS: ClefPositions = ClefPositions {
    name: "bass",
    lines: ["G2", "B2", "D3", "F3", "A3"],
    spaces: ["A2", "C3", "E3", "G3"],
    ledger_above: &["B3", "C4", "D4", "E4", "F4", "G4", "A4"],
    ledger_below: &["E2", "D2", "C2", "B1", "A1", "G1", "F1"],
};

const ALTO_POSITIONS: ClefPositions = ClefPositions {
    name: "alto",
    lines: ["A3", "C4", "E4", "G4", "B4"],
    spaces: ["B3", "D4", "F4", "A4"],
    ledger_above: &["C5", "D5", "E5", "F5", "G5"],
    ledger_below: &["G3", "F3", "E3", "D3", "C3"],
};

impl Clef {
    pub fn positions(&self) -> &'static ClefPositions {
        match self {
            Clef::Treble => &TREBLE_POSITIONS,
            Clef::Bass => &BASS_POSITIONS,
            Clef::Alto => &ALTO_POSITIONS,
        }
    }

    pub fn name(&self) -> &'static str {
        self.positions().name
    }

    /// Parse a clef name as used in config files
    pub fn parse(name: &str) -> Option<Clef> {
        match name {
            "treble" => Some(Clef::Treble),
            "bass" => Some(Clef::Bass),
            "alto" => Some(Clef::Alto),
            _ => None,
        }
    }

    /// Full pitch vocabulary of this clef: lines, spaces and both ledger
    /// sequences
    pub fn vocabulary(&self) -> impl Iterator<Item = &'static str> {
        let p = self.positions();
        p.lines
            .into_iter()
            .chain(p.spaces)
            .chain(p.ledger_above.iter().copied())
            .chain(p.ledger_below.iter().copied())
    }

    /// Whether a note name like "B4" belongs to this clef's vocabulary
    pub fn contains(&self, name: &str) -> bool {
        self.vocabulary().any(|n| n == name)
    }
}

/// A pitch resolved from a staff position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    /// Letter A-G with optional sharp, e.g. "B" or "F#"
    pub note: String,
    pub octave: u8,
}

impl Pitch {
    /// Full note name, e.g. "B4"
    pub fn full_name(&self) -> String {
        format!("{}{}", self.note, self.octave)
    }
}

/// Parse a pitch string of the form `[A-G]#?` + single-digit octave
pub fn parse_pitch(name: &str) -> Option<Pitch> {
    let octave_char = name.chars().last()?;
    let octave = octave_char.to_digit(10)? as u8;
    let note = &name[..name.len() - 1];
    let mut chars = note.chars();
    match chars.next()? {
        'A'..='G' => {}
        _ => return None,
    }
    match chars.next() {
        None => {}
        Some('#') if chars.next().is_none() => {}
        Some(_) => return None,
    }
    Some(Pitch {
        note: note.to_string(),
        octave,
    })
}

/// Resolve a staff-position index to a pitch name for the given clef.
///
/// Index 0..5 selects a line, 5..9 a space. Out-of-range slots fall back to
/// the ledger tables: negative indices use the below-staff sequence at
/// `|index| - 1`, indices past the spaces use the above-staff sequence at
/// `index - 9`. The arithmetic is a heuristic approximation of ledger-line
/// counting and is kept as-is for reproducibility.
pub fn pitch_name_for_index(index: i32, clef: Clef) -> Option<&'static str> {
    let positions = clef.positions();
    let lines_len = positions.lines.len() as i32;
    let spaces_len = positions.spaces.len() as i32;

    let (table, slot): (&[&'static str], i32) = if index < lines_len {
        (&positions.lines, index)
    } else {
        (&positions.spaces, index - lines_len)
    };

    let (table, slot) = if slot < 0 || slot >= table.len() as i32 {
        if index < 0 {
            (positions.ledger_below, index.abs() - 1)
        } else {
            (positions.ledger_above, index - (lines_len + spaces_len))
        }
    } else {
        (table, slot)
    };

    if slot < 0 || slot >= table.len() as i32 {
        return None;
    }
    Some(table[slot as usize])
}

/// Map a candidate's vertical position to a pitch via the nearest staff
/// line (ties break to the first-encountered cluster).
///
/// Requires a full 5-cluster staff; returns None otherwise, which drops the
/// candidate without failing the analysis.
pub fn map_position(y: usize, staff_lines: &[StaffLine], clef: Clef) -> Option<Pitch> {
    if staff_lines.len() < 5 {
        return None;
    }

    let mut closest_index = None;
    let mut min_distance = usize::MAX;
    for (index, line) in staff_lines.iter().enumerate() {
        let distance = y.abs_diff(line.y);
        if distance < min_distance {
            min_distance = distance;
            closest_index = Some(index);
        }
    }

    let index = closest_index? as i32;
    let name = pitch_name_for_index(index, clef)?;
    parse_pitch(name)
}
