//! Pitch classes and semitone arithmetic
//!
//! The twelve chromatic pitch classes with their reference frequencies in
//! the fourth octave (A4 = 440 Hz, 12-tone equal temperament).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of pitch classes in the chromatic cycle
pub const SEMITONES_PER_OCTAVE: u8 = 12;

/// One of the twelve octave-independent chromatic notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order starting from C
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Semitones above C (0-11)
    pub fn index(self) -> u8 {
        match self {
            PitchClass::C => 0,
            PitchClass::CSharp => 1,
            PitchClass::D => 2,
            PitchClass::DSharp => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::FSharp => 6,
            PitchClass::G => 7,
            PitchClass::GSharp => 8,
            PitchClass::A => 9,
            PitchClass::ASharp => 10,
            PitchClass::B => 11,
        }
    }

    /// Pitch class at a chromatic index, wrapping modulo 12
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % SEMITONES_PER_OCTAVE) as usize]
    }

    /// Reference frequency in Hz (octave 4)
    pub fn frequency(self) -> f64 {
        match self {
            PitchClass::C => 261.63,
            PitchClass::CSharp => 277.18,
            PitchClass::D => 293.66,
            PitchClass::DSharp => 311.13,
            PitchClass::E => 329.63,
            PitchClass::F => 349.23,
            PitchClass::FSharp => 369.99,
            PitchClass::G => 392.00,
            PitchClass::GSharp => 415.30,
            PitchClass::A => 440.00,
            PitchClass::ASharp => 466.16,
            PitchClass::B => 493.88,
        }
    }

    /// Pitch class `semitones` above this one.
    ///
    /// Closed over the 12-element cycle: transposing by 12 (or any multiple)
    /// returns the same pitch class.
    pub fn transpose(self, semitones: u32) -> Self {
        let offset = (semitones % SEMITONES_PER_OCTAVE as u32) as u8;
        Self::from_index(self.index() + offset)
    }

    /// Upward distance in semitones from `self` to `other` (0-11)
    pub fn semitones_to(self, other: PitchClass) -> u8 {
        (other.index() + SEMITONES_PER_OCTAVE - self.index()) % SEMITONES_PER_OCTAVE
    }

    /// Sharp spelling, e.g. "C#"
    pub fn short_name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    /// Display name with both enharmonic spellings, e.g. "C#/Db"
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::CSharp => "C#/Db",
            PitchClass::DSharp => "D#/Eb",
            PitchClass::FSharp => "F#/Gb",
            PitchClass::GSharp => "G#/Ab",
            PitchClass::ASharp => "A#/Bb",
            natural => natural.short_name(),
        }
    }
}

/// Reference frequency of a pitch class
pub fn frequency_of(pitch: PitchClass) -> f64 {
    pitch.frequency()
}

/// `(index(root) + semitones) mod 12`, mapped back to a pitch class
pub fn transpose(root: PitchClass, semitones: u32) -> PitchClass {
    root.transpose(semitones)
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = String;

    /// Accepts "C", "c#", "Db", "cs", "df" and the combined "C#/Db" form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // "C#/Db" style names parse by their first spelling
        let spelling = trimmed.split('/').next().unwrap_or(trimmed);
        let normalized = spelling.to_lowercase().replace('#', "s").replace('♯', "s");

        let mut chars = normalized.chars();
        let letter = chars.next().ok_or_else(|| "empty note name".to_string())?;
        let natural = match letter {
            'c' => 0,
            'd' => 2,
            'e' => 4,
            'f' => 5,
            'g' => 7,
            'a' => 9,
            'b' => 11,
            _ => return Err(format!("unknown note name: {}", trimmed)),
        };

        let accidental = chars.as_str();
        let index = match accidental {
            "" => natural,
            "s" => natural + 1,
            "b" | "f" | "♭" => natural + SEMITONES_PER_OCTAVE - 1,
            _ => return Err(format!("unknown accidental in note name: {}", trimmed)),
        };

        Ok(PitchClass::from_index(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Equal-temperament frequency for a MIDI note
    fn midi_to_freq(midi: u8) -> f64 {
        440.0 * 2.0_f64.powf((midi as f64 - 69.0) / 12.0)
    }

    #[test]
    fn test_frequency_table_matches_equal_temperament() {
        for pitch in PitchClass::ALL {
            let expected = midi_to_freq(60 + pitch.index());
            assert!(
                (pitch.frequency() - expected).abs() < 0.01,
                "{} should be {:.2} Hz, got {}",
                pitch,
                expected,
                pitch.frequency()
            );
        }
        assert_eq!(frequency_of(PitchClass::A), 440.0);
    }

    #[test]
    fn test_transpose_basic() {
        assert_eq!(transpose(PitchClass::C, 0), PitchClass::C);
        assert_eq!(transpose(PitchClass::C, 7), PitchClass::G);
        assert_eq!(transpose(PitchClass::G, 4), PitchClass::B);
        assert_eq!(transpose(PitchClass::A, 3), PitchClass::C);
        assert_eq!(transpose(PitchClass::B, 11), PitchClass::ASharp);
    }

    #[test]
    fn test_transpose_by_octave_is_identity() {
        for pitch in PitchClass::ALL {
            assert_eq!(pitch.transpose(12), pitch);
            assert_eq!(pitch.transpose(24), pitch);
        }
    }

    #[test]
    fn test_transpose_composes() {
        for pitch in PitchClass::ALL {
            for s1 in 0..12u32 {
                for s2 in 0..12u32 {
                    assert_eq!(
                        pitch.transpose(s1).transpose(s2),
                        pitch.transpose((s1 + s2) % 12)
                    );
                }
            }
        }
    }

    #[test]
    fn test_semitones_to() {
        assert_eq!(PitchClass::G.semitones_to(PitchClass::B), 4);
        assert_eq!(PitchClass::B.semitones_to(PitchClass::C), 1);
        assert_eq!(PitchClass::E.semitones_to(PitchClass::E), 0);
    }

    #[test]
    fn test_parse_note_names() {
        assert_eq!("C".parse::<PitchClass>(), Ok(PitchClass::C));
        assert_eq!("c#".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("cs".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("Db".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("df".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!("Cb".parse::<PitchClass>(), Ok(PitchClass::B));
        assert_eq!("A#/Bb".parse::<PitchClass>(), Ok(PitchClass::ASharp));
        assert!("H".parse::<PitchClass>().is_err());
        assert!("".parse::<PitchClass>().is_err());
        assert!("Cx".parse::<PitchClass>().is_err());
    }

    #[test]
    fn test_display_names_round_trip() {
        for pitch in PitchClass::ALL {
            assert_eq!(pitch.name().parse::<PitchClass>(), Ok(pitch));
        }
        assert_eq!(PitchClass::FSharp.to_string(), "F#/Gb");
    }
}
