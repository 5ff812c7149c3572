// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Voicing engine.
//!
//! Projects a chord's chromatic tones onto absolute pitch numbers
//! clustered around a voicing center. Four algorithms are available;
//! all of them share the octave-wrap primitive [`wrap_in_window`].

use std::collections::VecDeque;
use std::fmt;

use crate::error::{PadchordError, Result};
use crate::music::chord::Chord;

/// Default wrap window width in semitones (one octave).
pub const WRAP_WINDOW: i32 = 12;

/// Open-string pitches of a standard-tuned guitar: E2 A2 D3 G3 B3 E4.
const GUITAR_STRINGS: [i32; 6] = [40, 45, 50, 55, 59, 64];

/// Voicing algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoicingType {
    /// Root position: wrap the root, keep the exact chord shape above it
    Root,
    /// Wrap every tone independently into the window around the center
    Wrap,
    /// Only the wrapped root pitch
    Bass,
    /// Allocate tones to six guitar string lanes
    Guitar,
}

impl VoicingType {
    /// Stable name for config files and the CLI
    pub fn name(self) -> &'static str {
        match self {
            VoicingType::Root => "root",
            VoicingType::Wrap => "wrap",
            VoicingType::Bass => "bass",
            VoicingType::Guitar => "guitar",
        }
    }

    /// Look a voicing type up by name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "root" => Ok(VoicingType::Root),
            "wrap" => Ok(VoicingType::Wrap),
            "bass" => Ok(VoicingType::Bass),
            "guitar" => Ok(VoicingType::Guitar),
            other => Err(PadchordError::UnknownVoicingType(other.to_string())),
        }
    }
}

impl fmt::Display for VoicingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shift a pitch by whole octaves so it lands in the window around
/// `center`.
///
/// The window is biased upward: for the default width 12 the result is
/// the unique pitch congruent to `pitch` (mod 12) inside
/// `[center - 5, center + 6]`. The octave shift is the ceiling of the
/// real-valued lower bound on `n` in
/// `center - 5 <= pitch + 12n <= center + 6`, with an exact-integer
/// lower bound landing inclusively.
pub fn wrap_in_window(pitch: i32, center: i32, window: i32) -> i32 {
    debug_assert!(window >= 1);
    let bottom = -((window - 1) / 2);
    let top = window / 2;

    let diff = center - pitch;
    // Integer ceiling of (diff + bottom) / 12, exact multiples included
    let shifts = (diff + bottom + 11).div_euclid(12);
    debug_assert!(
        12 * shifts <= diff + top,
        "wrap window [{}, {}] around {} misses pitch {}",
        center + bottom,
        center + top,
        center,
        pitch
    );
    pitch + 12 * shifts
}

/// [`wrap_in_window`] with the default one-octave window.
pub fn wrap_to_center(pitch: i32, center: i32) -> i32 {
    wrap_in_window(pitch, center, WRAP_WINDOW)
}

/// Voice a chord into absolute pitch numbers.
///
/// `center` is the absolute pitch the result clusters around, `span`
/// the number of octaves to fill (must be positive), and `bass_note`
/// asks for an extra root an octave below the voiced root.
pub fn voice(
    chord: &Chord,
    center: i32,
    span: i32,
    bass_note: bool,
    voicing: VoicingType,
) -> Result<Vec<i32>> {
    if span <= 0 {
        return Err(PadchordError::InvalidVoicingRange(span));
    }

    let scale_root = chord.scale().root().pitch_class() as i32;
    let tones = chord.chromatic_tones();

    let pitches = match voicing {
        VoicingType::Root => root_voicing(chord, &tones, scale_root, center, span, bass_note),
        VoicingType::Wrap => wrap_voicing(chord, &tones, scale_root, center, span, bass_note),
        VoicingType::Bass => vec![wrap_to_center(scale_root + chord.root_tone(), center)],
        VoicingType::Guitar => guitar_voicing(&tones, scale_root),
    };
    Ok(pitches)
}

/// Root position: the root lands nearest the center, every other tone
/// keeps its exact chromatic distance from the root (no independent
/// wrapping), so the chord shape is preserved.
fn root_voicing(
    chord: &Chord,
    tones: &[i32],
    scale_root: i32,
    center: i32,
    span: i32,
    bass_note: bool,
) -> Vec<i32> {
    let root_tone = chord.root_tone();
    let root_pitch = wrap_to_center(scale_root + root_tone, center);

    let mut shape = vec![root_pitch];
    shape.extend(
        tones
            .iter()
            .filter(|&&t| t != root_tone)
            .map(|t| root_pitch + (t - root_tone)),
    );

    assemble(shape, root_pitch, span, bass_note)
}

/// Wrap: every tone is pulled into the window independently, which
/// reorders the chord but keeps it tight around the center.
fn wrap_voicing(
    chord: &Chord,
    tones: &[i32],
    scale_root: i32,
    center: i32,
    span: i32,
    bass_note: bool,
) -> Vec<i32> {
    let shape: Vec<i32> = tones
        .iter()
        .map(|&t| wrap_to_center(scale_root + t, center))
        .collect();
    let root_pitch = wrap_to_center(scale_root + chord.root_tone(), center);

    assemble(shape, root_pitch, span, bass_note)
}

/// Optional bass note below, then the shape, then octave duplicates.
fn assemble(shape: Vec<i32>, root_pitch: i32, span: i32, bass_note: bool) -> Vec<i32> {
    let mut pitches = Vec::with_capacity(shape.len() * span as usize + 1);
    if bass_note {
        pitches.push(root_pitch - 12);
    }
    pitches.extend_from_slice(&shape);
    for octave in 1..span {
        pitches.extend(shape.iter().map(|p| p + 12 * octave));
    }
    pitches
}

/// Greedy guitar-string allocation.
///
/// Each string lane accepts one pitch in the band from its open pitch
/// up to the next string's open pitch. Lanes are filled bottom-up,
/// consuming each tone at most once per pass; the candidate pool is
/// replenished from the full tone list once exhausted, and a lane is
/// skipped when no candidate fits within one full cycle. Never fails;
/// it may produce fewer pitches than there are lanes.
fn guitar_voicing(tones: &[i32], scale_root: i32) -> Vec<i32> {
    if tones.is_empty() {
        return Vec::new();
    }

    let mut pool: VecDeque<i32> = tones.iter().copied().collect();
    let mut pitches = Vec::with_capacity(GUITAR_STRINGS.len());

    for (i, &open) in GUITAR_STRINGS.iter().enumerate() {
        let bound = GUITAR_STRINGS
            .get(i + 1)
            .copied()
            // Top string keeps its neighbor's fourth-wide band
            .unwrap_or(open + 5);

        if pool.is_empty() {
            pool.extend(tones.iter().copied());
        }

        for _ in 0..pool.len() {
            let tone = pool.pop_front().expect("pool is non-empty");
            let pitch = open + (scale_root + tone - open).rem_euclid(12);
            if pitch < bound {
                pitches.push(pitch);
                break;
            }
            pool.push_back(tone);
        }
    }

    pitches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::scale::Scale;

    fn c_triad() -> Chord {
        Chord::new(Scale::parse("Cmaj").unwrap(), 1).unwrap()
    }

    #[test]
    fn test_wrap_band() {
        // Window 12 around 48: results land in [43, 54]
        for pitch in -12..=127 {
            let wrapped = wrap_to_center(pitch, 48);
            assert!(wrapped > 42 && wrapped <= 54, "{} -> {}", pitch, wrapped);
            assert_eq!(wrapped.rem_euclid(12), pitch.rem_euclid(12));
        }
    }

    #[test]
    fn test_wrap_integer_boundary_is_inclusive() {
        // 43 is exactly center - 5; it must stay put, not jump to 55
        assert_eq!(wrap_to_center(43, 48), 43);
        assert_eq!(wrap_to_center(55, 48), 43);
        // center + 6 stays put as well
        assert_eq!(wrap_to_center(54, 48), 54);
        assert_eq!(wrap_to_center(42, 48), 54);
    }

    #[test]
    fn test_root_voicing_preserves_shape() {
        let tones = c_triad().chromatic_tones();
        let voiced = voice(&c_triad(), 48, 1, false, VoicingType::Root).unwrap();
        assert_eq!(voiced, vec![48, 52, 55]);
        for (i, &p) in voiced.iter().enumerate() {
            assert_eq!(p - voiced[0], tones[i] - tones[0]);
        }
    }

    #[test]
    fn test_root_voicing_bass_and_span() {
        let voiced = voice(&c_triad(), 48, 2, true, VoicingType::Root).unwrap();
        assert_eq!(voiced, vec![36, 48, 52, 55, 60, 64, 67]);
    }

    #[test]
    fn test_wrap_voicing_pulls_tones_into_window() {
        let voiced = voice(&c_triad(), 48, 1, false, VoicingType::Wrap).unwrap();
        // G wraps below the center instead of staying above
        assert_eq!(voiced, vec![48, 52, 43]);
        for &p in &voiced {
            assert!(p > 42 && p <= 54);
        }
    }

    #[test]
    fn test_wrap_voicing_bass_is_octave_below_root() {
        let voiced = voice(&c_triad(), 48, 1, true, VoicingType::Wrap).unwrap();
        assert_eq!(voiced[0], 36);
    }

    #[test]
    fn test_bass_voicing_single_root() {
        let voiced = voice(&c_triad(), 48, 1, true, VoicingType::Bass).unwrap();
        assert_eq!(voiced, vec![48]);

        // ii chord: the root is D
        let ii = Chord::new(Scale::parse("Cmaj").unwrap(), 2).unwrap();
        let voiced = voice(&ii, 48, 1, false, VoicingType::Bass).unwrap();
        assert_eq!(voiced, vec![50]);
    }

    #[test]
    fn test_guitar_voicing_c_major() {
        let voiced = voice(&c_triad(), 48, 1, false, VoicingType::Guitar).unwrap();
        // E2 C3 G3 C4 E4; the D3 lane finds no chord tone in its band
        assert_eq!(voiced, vec![40, 48, 55, 60, 64]);
    }

    #[test]
    fn test_guitar_voicing_never_fails() {
        // A single tone still fills every lane it fits
        let chord =
            Chord::with_tensions(Scale::parse("Cmaj").unwrap(), 1, &[], &["3", "5"]).unwrap();
        let voiced = voice(&chord, 48, 1, false, VoicingType::Guitar).unwrap();
        assert!(!voiced.is_empty());
        for &p in &voiced {
            assert_eq!(p.rem_euclid(12), 0, "only C pitch classes expected");
        }
    }

    #[test]
    fn test_invalid_span_rejected() {
        assert!(matches!(
            voice(&c_triad(), 48, 0, false, VoicingType::Root),
            Err(PadchordError::InvalidVoicingRange(0))
        ));
        assert!(matches!(
            voice(&c_triad(), 48, -1, false, VoicingType::Wrap),
            Err(PadchordError::InvalidVoicingRange(-1))
        ));
    }

    #[test]
    fn test_voicing_type_names() {
        for v in [
            VoicingType::Root,
            VoicingType::Wrap,
            VoicingType::Bass,
            VoicingType::Guitar,
        ] {
            assert_eq!(VoicingType::from_name(v.name()).unwrap(), v);
        }
        assert!(matches!(
            VoicingType::from_name("drop2"),
            Err(PadchordError::UnknownVoicingType(_))
        ));
    }
}
