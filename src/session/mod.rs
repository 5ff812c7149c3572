// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Session state: pads and the active pad stack.
//!
//! A pad is the engine-side model of one physical control-surface pad.
//! The stack records press order of currently-held pads and answers the
//! two questions the engine cares about: which chord is governing
//! (last-pressed chord pad wins) and which modifiers are active (press
//! order, oldest first).

use std::fmt;
use std::sync::Arc;

use crate::error::{PadchordError, Result};
use crate::music::chord::Chord;
use crate::music::modifier::Modifier;
use crate::music::scale::Note;

/// Opaque pad identity.
///
/// Identity, not value: two pads carrying byte-identical chords remain
/// distinguishable by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadId(pub u64);

impl fmt::Display for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pad {}", self.0)
    }
}

/// Display colors understood by the surface collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadColor {
    Black,
    White,
    Green,
    Turquoise,
    Purple,
    Red,
    Blue,
    Yellow,
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PadColor::Black => "black",
            PadColor::White => "white",
            PadColor::Green => "green",
            PadColor::Turquoise => "turquoise",
            PadColor::Purple => "purple",
            PadColor::Red => "red",
            PadColor::Blue => "blue",
            PadColor::Yellow => "yellow",
        };
        write!(f, "{}", name)
    }
}

/// Color tag for a modifier's pad.
pub fn modifier_color(modifier: Modifier) -> PadColor {
    match modifier {
        Modifier::Sus2 | Modifier::Sus4 => PadColor::Purple,
        Modifier::Parallel => PadColor::Red,
        Modifier::Add6 | Modifier::Add7 | Modifier::Add9 | Modifier::Add11 => PadColor::Blue,
    }
}

/// What a pad carries.
#[derive(Debug, Clone, PartialEq)]
pub enum PadKind {
    /// Plays a chord
    Chord(Chord),
    /// Applies one modifier while held
    Modifier(Modifier),
    /// Applies a bundle of modifiers while held
    ModifierBank(Vec<Modifier>),
    /// Display-only note pad, target of highlight requests
    Note(Note),
}

/// One control-surface pad.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    id: PadId,
    kind: PadKind,
}

impl Pad {
    /// A pad that plays a chord
    pub fn chord(id: PadId, chord: Chord) -> Self {
        Self {
            id,
            kind: PadKind::Chord(chord),
        }
    }

    /// A pad that applies one modifier
    pub fn modifier(id: PadId, modifier: Modifier) -> Self {
        Self {
            id,
            kind: PadKind::Modifier(modifier),
        }
    }

    /// A pad that applies several modifiers at once
    pub fn bank(id: PadId, modifiers: Vec<Modifier>) -> Self {
        Self {
            id,
            kind: PadKind::ModifierBank(modifiers),
        }
    }

    /// A display-only note pad
    pub fn note(id: PadId, note: Note) -> Self {
        Self {
            id,
            kind: PadKind::Note(note),
        }
    }

    pub fn id(&self) -> PadId {
        self.id
    }

    pub fn kind(&self) -> &PadKind {
        &self.kind
    }

    /// The chord this pad carries, if any
    pub fn chord_ref(&self) -> Option<&Chord> {
        match &self.kind {
            PadKind::Chord(chord) => Some(chord),
            _ => None,
        }
    }

    /// The modifiers this pad carries, in bundle order
    pub fn modifiers(&self) -> &[Modifier] {
        match &self.kind {
            PadKind::Modifier(m) => std::slice::from_ref(m),
            PadKind::ModifierBank(mods) => mods,
            _ => &[],
        }
    }

    /// Whether pressing or releasing this pad can change what sounds
    pub fn affects_harmony(&self) -> bool {
        matches!(
            self.kind,
            PadKind::Chord(_) | PadKind::Modifier(_) | PadKind::ModifierBank(_)
        )
    }

    /// Resting color
    pub fn default_color(&self) -> PadColor {
        match &self.kind {
            PadKind::Chord(chord) if chord.is_scale_root() => PadColor::Turquoise,
            PadKind::Chord(_) => PadColor::White,
            PadKind::Modifier(m) => modifier_color(*m),
            PadKind::ModifierBank(_) => PadColor::Blue,
            PadKind::Note(_) => PadColor::Black,
        }
    }

    /// Color while held
    pub fn press_color(&self) -> PadColor {
        PadColor::Green
    }
}

/// One held pad on the stack.
#[derive(Debug, Clone)]
struct StackEntry {
    pad: Arc<Pad>,
    velocity: u8,
}

/// Result of removing a pad from the stack.
#[derive(Debug, Clone)]
pub struct RemovedPad {
    pub pad: Arc<Pad>,
    pub velocity: u8,
    /// Whether the removed pad was the governing chord pad; drives
    /// whether note-off fires.
    pub was_governing: bool,
}

/// Ordered press log of currently-held pads.
///
/// One structure, two queries: press-order modifier collection (forward
/// scan) and governing-chord resolution (backward scan).
#[derive(Debug, Clone, Default)]
pub struct PadStack {
    entries: Vec<StackEntry>,
}

impl PadStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Appends unconditionally; the same pad held twice
    /// is two entries.
    pub fn push(&mut self, pad: Arc<Pad>, velocity: u8) {
        self.entries.push(StackEntry { pad, velocity });
    }

    /// Record a release: scan from the most-recently-pressed end and
    /// remove the first entry with this identity.
    ///
    /// Returns [`PadchordError::StackUnderflow`] when the pad is not on
    /// the stack (out-of-order event from before initialization); the
    /// caller logs and carries on.
    pub fn remove(&mut self, id: PadId) -> Result<RemovedPad> {
        let position = self
            .entries
            .iter()
            .rposition(|e| e.pad.id() == id)
            .ok_or(PadchordError::StackUnderflow(id.0))?;

        let governing = self
            .entries
            .iter()
            .rposition(|e| e.pad.chord_ref().is_some());
        let was_governing = governing == Some(position);

        let entry = self.entries.remove(position);
        Ok(RemovedPad {
            pad: entry.pad,
            velocity: entry.velocity,
            was_governing,
        })
    }

    /// The governing chord: the last-pressed still-held chord pad's
    /// chord. Last-pressed-wins, not last-in-array.
    pub fn current_chord(&self) -> Option<&Chord> {
        self.entries
            .iter()
            .rev()
            .find_map(|e| e.pad.chord_ref())
    }

    /// Whether any chord pad is held.
    pub fn has_chord(&self) -> bool {
        self.current_chord().is_some()
    }

    /// All active modifiers in press order (oldest first), bank contents
    /// included, each modifier contributing once.
    pub fn current_modifiers(&self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        for entry in &self.entries {
            for &m in entry.pad.modifiers() {
                if !modifiers.contains(&m) {
                    modifiers.push(m);
                }
            }
        }
        modifiers
    }

    /// Number of held pads.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
