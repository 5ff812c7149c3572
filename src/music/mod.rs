// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmonic-theory data model.
//!
//! This module provides:
//! - Scale-degree arithmetic with accidentals
//! - Diatonic scales keyed by a root pitch class
//! - Chord construction, extension and omission semantics
//! - The chord modifier catalogue

pub mod chord;
pub mod degree;
pub mod modifier;
pub mod scale;

pub use chord::Chord;
pub use degree::ScaleDegree;
pub use modifier::Modifier;
pub use scale::{MidiNote, Note, Scale, ScaleQuality, Semitones, DIATONIC_NOTES};
