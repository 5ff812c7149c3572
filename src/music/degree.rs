// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale-degree arithmetic.
//!
//! A [`ScaleDegree`] is a position in a 7-note diatonic scale with an
//! accidental offset. User-facing input is 1-indexed ("1" is the root,
//! "b3" a flattened third); the conversion to the 0-indexed internal form
//! happens once at construction.
//!
//! Equality is structural on `(index, accidental)`. Enharmonic
//! equivalence (e.g. a sharpened third versus a fourth where the scale
//! makes them the same pitch) is deliberately not implemented.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use crate::error::{PadchordError, Result};
use crate::music::scale::DIATONIC_NOTES;

/// A 0-indexed scale position with an accidental in {-1, 0, +1}.
///
/// Unbounded above: index 8 is the ninth degree, one octave above the
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScaleDegree {
    // Field order matters: derived ordering compares index before accidental.
    index: u16,
    accidental: i8,
}

impl ScaleDegree {
    /// Construct from a 1-indexed degree number.
    pub fn from_index1(degree: u16) -> Result<Self> {
        if degree == 0 {
            return Err(PadchordError::InvalidDegree(
                "degrees are 1-indexed; 0 is out of range".to_string(),
            ));
        }
        Ok(Self {
            index: degree - 1,
            accidental: 0,
        })
    }

    /// Construct from a 1-indexed degree number and an accidental offset.
    pub fn with_accidental(degree: u16, accidental: i8) -> Result<Self> {
        if !(-1..=1).contains(&accidental) {
            return Err(PadchordError::InvalidDegree(format!(
                "accidental {} out of range (double accidentals unsupported)",
                accidental
            )));
        }
        let mut d = Self::from_index1(degree)?;
        d.accidental = accidental;
        Ok(d)
    }

    /// The 0-indexed scale position.
    pub fn index(&self) -> u16 {
        self.index
    }

    /// The accidental offset in semitones (-1, 0 or +1).
    pub fn accidental(&self) -> i8 {
        self.accidental
    }

    /// Whether this is the unaltered root degree.
    pub fn is_root(&self) -> bool {
        self.index == 0 && self.accidental == 0
    }

    /// Index reduced into a single octave (0..7).
    ///
    /// The 7-note diatonic assumption is hardcoded; see
    /// [`DIATONIC_NOTES`].
    pub fn in_octave(&self) -> u16 {
        self.index % DIATONIC_NOTES as u16
    }

    /// This degree folded into the first octave, accidental preserved.
    pub fn in_octave_degree(&self) -> Self {
        Self {
            index: self.in_octave(),
            accidental: self.accidental,
        }
    }
}

impl Add for ScaleDegree {
    type Output = ScaleDegree;

    /// Degree addition: indices and accidentals sum independently, then
    /// an accidental of magnitude 2 carries one unit into the index and
    /// resets to 0 (two sharps collapse into the next degree up).
    fn add(self, other: ScaleDegree) -> ScaleDegree {
        let mut index = self.index as i32 + other.index as i32;
        let mut accidental = self.accidental + other.accidental;

        if accidental == 2 {
            accidental = 0;
            index += 1;
        } else if accidental == -2 {
            accidental = 0;
            index -= 1;
        }

        // A downward carry below the root is unreachable through the
        // modifier catalogue (nothing contributes a flattened unison).
        debug_assert!(index >= 0, "degree addition carried below the root");
        ScaleDegree {
            index: index.max(0) as u16,
            accidental,
        }
    }
}

impl FromStr for ScaleDegree {
    type Err = PadchordError;

    /// Parse a 1-indexed degree with optional accidental prefix:
    /// `"5"`, `"b3"`, `"#5"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PadchordError::InvalidDegree("empty input".to_string()));
        }

        let (accidental, number) = match s.chars().next() {
            Some('#') => (1, &s[1..]),
            Some('b') => (-1, &s[1..]),
            Some(c) if c.is_ascii_digit() => (0, s),
            _ => {
                return Err(PadchordError::InvalidDegree(format!(
                    "'{}' should start with #, b or a digit",
                    s
                )))
            }
        };

        let degree: u16 = number
            .parse()
            .map_err(|_| PadchordError::InvalidDegree(format!("'{}' is not a degree number", s)))?;
        Self::with_accidental(degree, accidental)
    }
}

impl fmt::Display for ScaleDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.accidental {
            -1 => "b",
            1 => "#",
            _ => "",
        };
        write!(f, "{}{}", prefix, self.index + 1)
    }
}
