// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord modifiers.
//!
//! Each modifier is a total pure function from chord to chord. When a
//! modifier's precondition does not hold (e.g. sus on a chord whose
//! third is already gone) it returns the chord unchanged rather than
//! failing. Modifiers are folded over the chord in activation order, so
//! layering order is observable and preserved.

use std::fmt;

use crate::music::chord::Chord;
use crate::music::degree::ScaleDegree;

/// The modifier catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Replace the third with the second
    Sus2,
    /// Replace the third with the fourth
    Sus4,
    /// Swap chord quality (major third -> flattened, minor -> sharpened)
    Parallel,
    /// Add the sixth, omit the seventh
    Add6,
    /// Add the seventh
    Add7,
    /// Add the seventh and ninth
    Add9,
    /// Add the seventh, ninth and eleventh
    Add11,
}

impl Modifier {
    /// All modifiers in catalogue order
    pub const ALL: [Modifier; 7] = [
        Modifier::Sus2,
        Modifier::Sus4,
        Modifier::Parallel,
        Modifier::Add6,
        Modifier::Add7,
        Modifier::Add9,
        Modifier::Add11,
    ];

    /// Stable name for config files and the CLI
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Sus2 => "sus2",
            Modifier::Sus4 => "sus4",
            Modifier::Parallel => "parallel",
            Modifier::Add6 => "add6",
            Modifier::Add7 => "add7",
            Modifier::Add9 => "add9",
            Modifier::Add11 => "add11",
        }
    }

    /// Look a modifier up by name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Modifier::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Apply this modifier, producing a fresh chord.
    pub fn apply(self, chord: &Chord) -> Chord {
        match self {
            Modifier::Sus2 => sus(chord, 2),
            Modifier::Sus4 => sus(chord, 4),
            Modifier::Parallel => parallel(chord),
            Modifier::Add6 => chord.modified([degree(6)], [degree(7)]),
            Modifier::Add7 => chord.modified([degree(7)], []),
            Modifier::Add9 => chord.modified([degree(7), degree(9)], []),
            Modifier::Add11 => chord.modified([degree(7), degree(9), degree(11)], []),
        }
    }

    /// Fold a modifier list over a chord in activation order (oldest
    /// first). Each application builds a fresh chord whose addition and
    /// omission sets union onto the previous chord's.
    pub fn apply_all<'a>(chord: &Chord, modifiers: impl IntoIterator<Item = &'a Modifier>) -> Chord {
        modifiers
            .into_iter()
            .fold(chord.clone(), |chord, m| m.apply(&chord))
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Known-valid 1-indexed degree, for the catalogue tables.
fn degree(n: u16) -> ScaleDegree {
    ScaleDegree::from_index1(n).expect("catalogue degrees are valid")
}

/// Suspend the third to the given degree. No-op when the triad no
/// longer carries a third to substitute.
fn sus(chord: &Chord, replacement: u16) -> Chord {
    if !chord.triad_degrees().contains(&degree(3)) {
        return chord.clone();
    }
    chord.modified([degree(replacement)], [degree(3)])
}

/// Swap chord quality in place: a major third (4 semitones above the
/// root among the sounding tones) is flattened, a minor third (3)
/// sharpened. Anything else passes through.
fn parallel(chord: &Chord) -> Chord {
    let root = chord.root_tone();
    let mut above: Vec<i32> = chord
        .chromatic_tones()
        .into_iter()
        .filter(|&t| t > root)
        .collect();
    above.sort_unstable();

    match above.first().map(|t| t - root) {
        Some(4) => chord.modified(["b3".parse().expect("b3 parses")], [degree(3)]),
        Some(3) => chord.modified(["#3".parse().expect("#3 parses")], [degree(3)]),
        _ => chord.clone(),
    }
}
