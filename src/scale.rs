//! Diatonic modes and scale derivation
//!
//! Each mode is a fixed pattern of semitone offsets from its root. A scale is
//! derived by transposing the root by every offset in order.

use crate::pitch::{PitchClass, SEMITONES_PER_OCTAVE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of degrees in every diatonic mode
pub const DEGREES: usize = 7;

/// The seven diatonic modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleMode {
    /// Major: W-W-H-W-W-W-H
    Ionian,
    /// Minor with raised 6th
    Dorian,
    /// Minor with lowered 2nd
    Phrygian,
    /// Major with raised 4th
    Lydian,
    /// Major with lowered 7th
    Mixolydian,
    /// Natural minor
    Aeolian,
    /// Lowered 2nd and 5th
    Locrian,
}

impl ScaleMode {
    pub const ALL: [ScaleMode; 7] = [
        ScaleMode::Ionian,
        ScaleMode::Dorian,
        ScaleMode::Phrygian,
        ScaleMode::Lydian,
        ScaleMode::Mixolydian,
        ScaleMode::Aeolian,
        ScaleMode::Locrian,
    ];

    /// Semitone offsets from the root for degrees 1-7
    pub fn offsets(self) -> [u8; DEGREES] {
        match self {
            ScaleMode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            ScaleMode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            ScaleMode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            ScaleMode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            ScaleMode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            ScaleMode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            ScaleMode::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    /// Ordered pitch classes of this mode built on `root`
    pub fn pitches(self, root: PitchClass) -> Vec<PitchClass> {
        self.offsets()
            .iter()
            .map(|&offset| root.transpose(offset as u32))
            .collect()
    }

    /// Whole/half step pattern across the full octave, e.g. "W-W-H-W-W-W-H".
    ///
    /// Includes the closing step from the 7th degree back up to the octave.
    pub fn pattern(self) -> String {
        let offsets = self.offsets();
        let closing = [offsets[DEGREES - 1], SEMITONES_PER_OCTAVE];

        offsets
            .windows(2)
            .chain(std::iter::once(&closing[..]))
            .map(|pair| if pair[1] - pair[0] == 2 { "W" } else { "H" })
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleMode::Ionian => "Ionian",
            ScaleMode::Dorian => "Dorian",
            ScaleMode::Phrygian => "Phrygian",
            ScaleMode::Lydian => "Lydian",
            ScaleMode::Mixolydian => "Mixolydian",
            ScaleMode::Aeolian => "Aeolian",
            ScaleMode::Locrian => "Locrian",
        }
    }
}

/// Ordered pitch sequence of `mode` built on `root`
pub fn pitches_of(mode: ScaleMode, root: PitchClass) -> Vec<PitchClass> {
    mode.pitches(root)
}

/// Whole/half step pattern string of `mode`
pub fn pattern_string(mode: ScaleMode) -> String {
    mode.pattern()
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "ionian" | "major" => Ok(ScaleMode::Ionian),
            "dorian" => Ok(ScaleMode::Dorian),
            "phrygian" => Ok(ScaleMode::Phrygian),
            "lydian" => Ok(ScaleMode::Lydian),
            "mixolydian" => Ok(ScaleMode::Mixolydian),
            "aeolian" | "minor" => Ok(ScaleMode::Aeolian),
            "locrian" => Ok(ScaleMode::Locrian),
            _ => Err(format!("unknown scale mode: {}", s.trim())),
        }
    }
}
