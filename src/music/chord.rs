// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord construction and derivation.
//!
//! A [`Chord`] is a root scale degree within a scale plus explicit
//! addition and omission sets. The base triad {1, 3, 5} is derived on
//! demand; omissions are applied after additions, so an omission can
//! cancel an addition. Chords are immutable value objects: every
//! transformation builds a fresh chord.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;
use crate::music::degree::ScaleDegree;
use crate::music::scale::{Note, Scale};

/// A chord function within a scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    scale: Scale,
    root: ScaleDegree,
    additions: BTreeSet<ScaleDegree>,
    omissions: BTreeSet<ScaleDegree>,
}

impl Chord {
    /// Create the plain triad on a 1-indexed scale degree.
    pub fn new(scale: Scale, degree: u16) -> Result<Self> {
        Ok(Self {
            scale,
            root: ScaleDegree::from_index1(degree)?,
            additions: BTreeSet::new(),
            omissions: BTreeSet::new(),
        })
    }

    /// Create a chord with chord-relative additions and omissions given
    /// as degree strings (e.g. additions `["7", "9"]`, omissions `["5"]`).
    pub fn with_tensions(
        scale: Scale,
        degree: u16,
        additions: &[&str],
        omissions: &[&str],
    ) -> Result<Self> {
        let mut chord = Self::new(scale, degree)?;
        for s in additions {
            chord.additions.insert(s.parse()?);
        }
        for s in omissions {
            chord.omissions.insert(s.parse()?);
        }
        Ok(chord)
    }

    /// Build a new chord from this one with extra additions and omissions
    /// unioned in. This is how modifiers derive chords without mutation.
    pub fn modified(
        &self,
        additions: impl IntoIterator<Item = ScaleDegree>,
        omissions: impl IntoIterator<Item = ScaleDegree>,
    ) -> Self {
        let mut chord = self.clone();
        chord.additions.extend(additions);
        chord.omissions.extend(omissions);
        chord
    }

    /// The scale this chord lives in.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// The chord's root degree folded into one octave.
    pub fn root_degree(&self) -> ScaleDegree {
        self.root.in_octave_degree()
    }

    /// Whether this chord is rooted on the scale's first degree.
    pub fn is_scale_root(&self) -> bool {
        self.root.is_root()
    }

    /// The chord-relative triad degrees {1, 3, 5} minus omissions.
    ///
    /// Pure set difference: omitting the third leaves {1, 5}, it does
    /// not shift the fifth down.
    pub fn triad_degrees(&self) -> Vec<ScaleDegree> {
        [1u16, 3, 5]
            .iter()
            .map(|&n| ScaleDegree::from_index1(n).expect("triad degrees are valid"))
            .filter(|d| !self.omissions.contains(d))
            .collect()
    }

    /// Absolute scale degrees: (triad ∪ additions) minus omissions, each
    /// transposed by the root degree (degree arithmetic, not semitones).
    pub fn scale_degrees(&self) -> Vec<ScaleDegree> {
        let mut relative = self.triad_degrees();
        for addition in &self.additions {
            if !relative.contains(addition) {
                relative.push(*addition);
            }
        }
        relative.retain(|d| !self.omissions.contains(d));
        relative.into_iter().map(|d| self.root + d).collect()
    }

    /// Chromatic tone (semitones from the scale root, unbounded above 11)
    /// for one absolute scale degree.
    fn tone_of(&self, degree: ScaleDegree) -> i32 {
        self.scale.offset_at(degree.index()) + degree.accidental() as i32
    }

    /// The chord's tones as chromatic offsets from the scale root.
    ///
    /// Independent of any octave or reference pitch; an added ninth on a
    /// root-position chord comes out as 14.
    pub fn chromatic_tones(&self) -> Vec<i32> {
        self.scale_degrees()
            .into_iter()
            .map(|d| self.tone_of(d))
            .collect()
    }

    /// Chromatic tone of the chord's root degree, whether or not the
    /// root is present in the derived tones.
    pub fn root_tone(&self) -> i32 {
        self.tone_of(self.root)
    }

    /// Chromatic interval between the chord root and a chord-relative
    /// degree (e.g. the bare third, to test chord quality).
    pub fn interval_from_root(&self, relative: ScaleDegree) -> i32 {
        self.tone_of(self.root + relative) - self.root_tone()
    }

    /// The scale root resolved to the absolute pitch nearest `reference`.
    ///
    /// Ties between the octave above and below break upward (at most 6
    /// semitones up, 5 down).
    fn scale_root_near(&self, reference: i32) -> i32 {
        let pc = self.scale.root().pitch_class() as i32;
        let up = (pc - reference).rem_euclid(12);
        if up <= 6 {
            reference + up
        } else {
            reference + up - 12
        }
    }

    /// Absolute pitch numbers: the scale root is placed at the octave
    /// nearest `reference`, then each chromatic tone is added.
    pub fn pitches(&self, reference: i32) -> Vec<i32> {
        let root = self.scale_root_near(reference);
        self.chromatic_tones().iter().map(|t| root + t).collect()
    }

    /// Absolute pitch numbers with the scale root placed at a fixed
    /// octave (MIDI convention, C4 = 60).
    pub fn pitches_at_octave(&self, octave: i8) -> Vec<i32> {
        let root = (octave as i32 + 1) * 12 + self.scale.root().pitch_class() as i32;
        self.chromatic_tones().iter().map(|t| root + t).collect()
    }

    /// Distinct pitch classes sounding in this chord.
    pub fn pitch_classes(&self) -> Vec<Note> {
        let root = self.scale.root().pitch_class() as i32;
        let mut seen = BTreeSet::new();
        self.chromatic_tones()
            .into_iter()
            .filter_map(|t| {
                let pc = (root + t).rem_euclid(12) as u8;
                seen.insert(pc).then(|| Note::from_pitch_class(pc))
            })
            .collect()
    }
}

impl fmt::Display for Chord {
    // e.g. "G maj 7 -3" for a G major chord with an added 7th, omitted 3rd
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root_pc =
            (self.scale.root().pitch_class() as i32 + self.root_tone()).rem_euclid(12) as u8;
        write!(f, "{} {}", Note::from_pitch_class(root_pc), self.scale.quality())?;
        for addition in &self.additions {
            write!(f, " {}", addition)?;
        }
        for omission in &self.omissions {
            write!(f, " -{}", omission)?;
        }
        Ok(())
    }
}
