// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Padchord - chord-pad harmony engine.
//!
//! A library for chord-pad instruments: scale-degree arithmetic, chord
//! construction with extensions and omissions, modifier application
//! (sus, parallel, adds), voicing into absolute pitch numbers, and a
//! pad-stack session model that turns press/release events into notes
//! and pad highlights.
//!
//! The modules layer bottom-up:
//! - [`music`]: scales, degrees, chords, modifiers
//! - [`voicing`]: chord tones to absolute pitches
//! - [`session`]: pads and the active pad stack
//! - [`engine`]: event handling over pluggable note/display collaborators
//! - [`midi`]: a `midir`-backed note transport
//! - [`config`]: YAML session files

pub mod config;
pub mod engine;
pub mod error;
pub mod midi;
pub mod music;
pub mod session;
pub mod voicing;

pub use config::{SessionConfig, SessionFile};
pub use engine::{Engine, HighlightRegistry, NoteSink, PadDisplay};
pub use error::{PadchordError, Result};
pub use music::{Chord, Modifier, Note, Scale, ScaleDegree, ScaleQuality};
pub use session::{Pad, PadColor, PadId, PadKind, PadStack};
pub use voicing::{voice, wrap_to_center, VoicingType};
