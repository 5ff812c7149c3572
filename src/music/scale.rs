// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scales and pitch classes.
//!
//! A [`Scale`] is a 7-note diatonic scale keyed by a root pitch class and a
//! major/minor quality. Scales are immutable: construct once, query forever.

use std::fmt;

use crate::error::{PadchordError, Result};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Semitone offset type
pub type Semitones = i8;

/// Number of degrees in a diatonic scale.
///
/// Degree arithmetic throughout this crate assumes 7-note scales; other
/// scale sizes (pentatonic, octatonic, ...) are not supported.
pub const DIATONIC_NOTES: u8 = 7;

/// Note names (pitch classes), sharp spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        match self {
            Note::C => 0,
            Note::Cs => 1,
            Note::D => 2,
            Note::Ds => 3,
            Note::E => 4,
            Note::F => 5,
            Note::Fs => 6,
            Note::G => 7,
            Note::Gs => 8,
            Note::A => 9,
            Note::As => 10,
            Note::B => 11,
        }
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse a note from a letter with optional accidental (e.g., "C", "C#", "Db")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let base = match letter {
            'C' => 0i8,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        let accidental = match chars.next() {
            None => 0i8,
            Some('#') => 1,
            Some('b') => -1,
            Some(_) => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Note::from_pitch_class((base + accidental).rem_euclid(12) as u8))
    }

    /// Transpose by semitones
    pub fn transpose(self, semitones: Semitones) -> Self {
        let new_pc = (self.pitch_class() as i8 + semitones).rem_euclid(12) as u8;
        Note::from_pitch_class(new_pc)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// Scale quality (diatonic major or natural minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleQuality {
    Major,
    Minor,
}

impl ScaleQuality {
    /// Semitone offsets from the root for each of the seven degrees
    pub fn intervals(self) -> &'static [u8; 7] {
        match self {
            ScaleQuality::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleQuality::Minor => &[0, 2, 3, 5, 7, 8, 10],
        }
    }

    /// Suffix used in scale names ("maj" / "min")
    pub fn suffix(self) -> &'static str {
        match self {
            ScaleQuality::Major => "maj",
            ScaleQuality::Minor => "min",
        }
    }
}

impl fmt::Display for ScaleQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// A diatonic scale: root pitch class plus quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scale {
    root: Note,
    quality: ScaleQuality,
}

impl Scale {
    /// Create a scale from root and quality
    pub fn new(root: Note, quality: ScaleQuality) -> Self {
        Self { root, quality }
    }

    /// Parse a scale name formatted as `<letter><optional # or b><"maj"|"min">`,
    /// e.g. "Cmaj", "G#min", "Bbmaj". Minimum length 4.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.len() < 4 || !name.is_ascii() {
            return Err(PadchordError::InvalidScaleName(name.to_string()));
        }
        let (note_part, quality_part) = name.split_at(name.len() - 3);
        let quality = match quality_part.to_ascii_lowercase().as_str() {
            "maj" => ScaleQuality::Major,
            "min" => ScaleQuality::Minor,
            _ => return Err(PadchordError::InvalidScaleName(name.to_string())),
        };
        let root = Note::parse(note_part)
            .ok_or_else(|| PadchordError::InvalidScaleName(name.to_string()))?;
        Ok(Scale::new(root, quality))
    }

    /// Get the root note
    pub fn root(&self) -> Note {
        self.root
    }

    /// Get the scale quality
    pub fn quality(&self) -> ScaleQuality {
        self.quality
    }

    /// Chromatic offset from the scale root for an unbounded degree index.
    ///
    /// Indices past the seventh degree wrap into higher octaves:
    /// `table[index mod 7] + 12 * (index div 7)`.
    pub fn offset_at(&self, index: u16) -> i32 {
        let table = self.quality.intervals();
        let wrapped = (index % DIATONIC_NOTES as u16) as usize;
        let octaves = (index / DIATONIC_NOTES as u16) as i32;
        table[wrapped] as i32 + 12 * octaves
    }

    /// The seven notes of this scale in degree order
    pub fn notes(&self) -> [Note; 7] {
        let table = self.quality.intervals();
        let mut notes = [self.root; 7];
        for (i, &offset) in table.iter().enumerate() {
            notes[i] = self.root.transpose(offset as Semitones);
        }
        notes
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)
    }
}
