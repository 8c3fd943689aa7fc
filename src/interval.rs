//! Named interval qualities within one octave

use crate::pitch::PitchClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalQuality {
    MinorSecond,
    MajorSecond,
    MinorThird,
    MajorThird,
    PerfectFourth,
    Tritone,
    PerfectFifth,
    MinorSixth,
    MajorSixth,
    MinorSeventh,
    MajorSeventh,
}

impl IntervalQuality {
    pub const ALL: [IntervalQuality; 11] = [
        IntervalQuality::MinorSecond,
        IntervalQuality::MajorSecond,
        IntervalQuality::MinorThird,
        IntervalQuality::MajorThird,
        IntervalQuality::PerfectFourth,
        IntervalQuality::Tritone,
        IntervalQuality::PerfectFifth,
        IntervalQuality::MinorSixth,
        IntervalQuality::MajorSixth,
        IntervalQuality::MinorSeventh,
        IntervalQuality::MajorSeventh,
    ];

    /// Distance in semitones (1-11)
    pub fn semitones(self) -> u8 {
        match self {
            IntervalQuality::MinorSecond => 1,
            IntervalQuality::MajorSecond => 2,
            IntervalQuality::MinorThird => 3,
            IntervalQuality::MajorThird => 4,
            IntervalQuality::PerfectFourth => 5,
            IntervalQuality::Tritone => 6,
            IntervalQuality::PerfectFifth => 7,
            IntervalQuality::MinorSixth => 8,
            IntervalQuality::MajorSixth => 9,
            IntervalQuality::MinorSeventh => 10,
            IntervalQuality::MajorSeventh => 11,
        }
    }

    /// Quality spanning `semitones`, if it is in 1-11
    pub fn from_semitones(semitones: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|q| q.semitones() == semitones)
    }

    /// Pitch class this interval reaches above `root`
    pub fn above(self, root: PitchClass) -> PitchClass {
        root.transpose(self.semitones() as u32)
    }

    pub fn name(self) -> &'static str {
        match self {
            IntervalQuality::MinorSecond => "Minor 2nd",
            IntervalQuality::MajorSecond => "Major 2nd",
            IntervalQuality::MinorThird => "Minor 3rd",
            IntervalQuality::MajorThird => "Major 3rd",
            IntervalQuality::PerfectFourth => "Fourth",
            IntervalQuality::Tritone => "Aug 4th/Dim 5th",
            IntervalQuality::PerfectFifth => "Fifth",
            IntervalQuality::MinorSixth => "Minor 6th",
            IntervalQuality::MajorSixth => "Major 6th",
            IntervalQuality::MinorSeventh => "Minor 7th",
            IntervalQuality::MajorSeventh => "Major 7th",
        }
    }

    /// Compact shorthand, e.g. "m3", "P5", "TT"
    pub fn short_name(self) -> &'static str {
        match self {
            IntervalQuality::MinorSecond => "m2",
            IntervalQuality::MajorSecond => "M2",
            IntervalQuality::MinorThird => "m3",
            IntervalQuality::MajorThird => "M3",
            IntervalQuality::PerfectFourth => "P4",
            IntervalQuality::Tritone => "TT",
            IntervalQuality::PerfectFifth => "P5",
            IntervalQuality::MinorSixth => "m6",
            IntervalQuality::MajorSixth => "M6",
            IntervalQuality::MinorSeventh => "m7",
            IntervalQuality::MajorSeventh => "M7",
        }
    }
}

/// Semitone distance of an interval quality
pub fn semitones_of(quality: IntervalQuality) -> u8 {
    quality.semitones()
}

impl fmt::Display for IntervalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntervalQuality {
    type Err = String;

    /// Accepts the shorthand ("m3", "P5", "TT") or the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|q| q.short_name() == trimmed || q.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown interval: {}", trimmed))
    }
}
