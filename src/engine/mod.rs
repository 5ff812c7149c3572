// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The harmony engine.
//!
//! Receives press/release events from the control surface, maintains the
//! active pad stack, and turns the governing chord plus active modifiers
//! into note-on/note-off requests and pad highlight requests. The engine
//! never touches hardware: the note transport and the surface display
//! are collaborators behind [`NoteSink`] and [`PadDisplay`].
//!
//! Processing is single-threaded and synchronous; one event runs to
//! completion before the next is accepted. Callers that deliver events
//! from multiple threads must wrap the engine in one mutex so each
//! event's full processing stays atomic.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{PadchordError, Result};
use crate::music::chord::Chord;
use crate::music::modifier::Modifier;
use crate::music::scale::{Note, Scale};
use crate::session::{Pad, PadColor, PadId, PadStack};
use crate::voicing::{self, VoicingType};

/// Default velocity used when replaying a chord without a fresh press.
const DEFAULT_VELOCITY: u8 = 100;

/// Note transport collaborator (e.g. a MIDI output port).
///
/// Fire-and-forget: the engine does not wait for round-trips and logs
/// rather than propagates delivery errors mid-event.
pub trait NoteSink {
    /// Start sounding a pitch. `velocity` is never 0.
    fn note_on(&mut self, pitch: u8, velocity: u8) -> anyhow::Result<()>;

    /// Stop sounding a pitch.
    fn note_off(&mut self, pitch: u8) -> anyhow::Result<()>;
}

/// Control-surface display collaborator (pad colors).
pub trait PadDisplay {
    fn set_color(&mut self, pad: PadId, color: PadColor);
}

/// Read-only lookup table from highlight ids to display pads.
///
/// Built once at startup from the registered note pads and passed into
/// the engine; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct HighlightRegistry {
    pads: HashMap<String, PadId>,
}

impl HighlightRegistry {
    /// The highlight id for a pitch class.
    pub fn id_for(note: Note) -> String {
        format!("Note: {}", note)
    }

    /// Build the registry from a pad list, indexing every note pad.
    pub fn from_pads<'a>(pads: impl IntoIterator<Item = &'a Arc<Pad>>) -> Self {
        let mut table = HashMap::new();
        for pad in pads {
            if let crate::session::PadKind::Note(note) = pad.kind() {
                table.insert(Self::id_for(*note), pad.id());
            }
        }
        Self { pads: table }
    }

    /// Resolve a highlight id to its pad.
    pub fn resolve(&self, id: &str) -> Result<PadId> {
        self.pads
            .get(id)
            .copied()
            .ok_or_else(|| PadchordError::RegistryMiss(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }
}

/// Voicing configuration, mutated only by explicit configuration calls.
#[derive(Debug, Clone, Copy)]
struct VoicingConfig {
    center: i32,
    voicing: VoicingType,
    span: i32,
    bass_note: bool,
}

impl Default for VoicingConfig {
    fn default() -> Self {
        Self {
            center: 48, // C3
            voicing: VoicingType::Root,
            span: 1,
            bass_note: false,
        }
    }
}

/// The harmony engine.
pub struct Engine {
    sink: Box<dyn NoteSink>,
    display: Box<dyn PadDisplay>,
    pads: HashMap<PadId, Arc<Pad>>,
    registry: HighlightRegistry,
    stack: PadStack,
    config: VoicingConfig,
    /// Pitches with an outstanding note-on
    sounding: BTreeSet<u8>,
    /// Note pads currently lit by a highlight request
    highlighted: BTreeSet<PadId>,
    /// Velocity of the most recent non-zero press, used for replays
    last_velocity: u8,
    next_pad_id: u64,
}

impl Engine {
    pub fn new(sink: Box<dyn NoteSink>, display: Box<dyn PadDisplay>) -> Self {
        Self {
            sink,
            display,
            pads: HashMap::new(),
            registry: HighlightRegistry::default(),
            stack: PadStack::new(),
            config: VoicingConfig::default(),
            sounding: BTreeSet::new(),
            highlighted: BTreeSet::new(),
            last_velocity: DEFAULT_VELOCITY,
            next_pad_id: 0,
        }
    }

    // --- pad registration -------------------------------------------------

    fn register(&mut self, build: impl FnOnce(PadId) -> Pad) -> PadId {
        let id = PadId(self.next_pad_id);
        self.next_pad_id += 1;
        let pad = Arc::new(build(id));
        self.display.set_color(id, pad.default_color());
        self.pads.insert(id, pad);
        id
    }

    /// Register one chord pad.
    pub fn add_chord_pad(&mut self, chord: Chord) -> PadId {
        self.register(|id| Pad::chord(id, chord))
    }

    /// Register the seven diatonic chord pads of a scale, degree 1..=7.
    pub fn add_chord_row(&mut self, scale: Scale) -> Result<Vec<PadId>> {
        let mut ids = Vec::with_capacity(7);
        for degree in 1..=7u16 {
            let chord = Chord::new(scale, degree)?;
            ids.push(self.add_chord_pad(chord));
        }
        Ok(ids)
    }

    /// Register one modifier pad.
    pub fn add_modifier_pad(&mut self, modifier: Modifier) -> PadId {
        self.register(|id| Pad::modifier(id, modifier))
    }

    /// Register a composite pad bundling several modifiers.
    pub fn add_bank_pad(&mut self, modifiers: Vec<Modifier>) -> PadId {
        self.register(|id| Pad::bank(id, modifiers))
    }

    /// Register the twelve display-only note pads and rebuild the
    /// highlight registry over them.
    pub fn add_note_row(&mut self) -> Vec<PadId> {
        let ids: Vec<PadId> = Note::ALL
            .iter()
            .map(|&note| self.register(|id| Pad::note(id, note)))
            .collect();
        self.registry = HighlightRegistry::from_pads(self.pads.values());
        info!(pads = self.registry.len(), "highlight registry built");
        ids
    }

    // --- configuration ----------------------------------------------------

    /// Move the voicing center (absolute pitch).
    pub fn set_voicing_center(&mut self, center: i32) {
        self.config.center = center;
    }

    /// Select the voicing algorithm.
    pub fn set_voicing(&mut self, voicing: VoicingType) {
        self.config.voicing = voicing;
    }

    /// Set the octave span. Rejects non-positive spans up front so event
    /// processing never hits the precondition.
    pub fn set_span(&mut self, span: i32) -> Result<()> {
        if span <= 0 {
            return Err(PadchordError::InvalidVoicingRange(span));
        }
        self.config.span = span;
        Ok(())
    }

    /// Toggle the extra bass note an octave below the voiced root.
    pub fn set_bass_note(&mut self, bass_note: bool) {
        self.config.bass_note = bass_note;
    }

    // --- event processing -------------------------------------------------

    /// Process a pad press.
    pub fn handle_press(&mut self, id: PadId, velocity: u8) {
        let Some(pad) = self.pads.get(&id).cloned() else {
            warn!(%id, "press for unregistered pad ignored");
            return;
        };

        self.display.set_color(id, pad.press_color());
        if !pad.affects_harmony() {
            return;
        }

        if velocity > 0 {
            self.last_velocity = velocity;
        }
        self.stack.push(pad, velocity);
        self.resound();
    }

    /// Process a pad release.
    pub fn handle_release(&mut self, id: PadId, _velocity: u8) {
        let Some(pad) = self.pads.get(&id).cloned() else {
            warn!(%id, "release for unregistered pad ignored");
            return;
        };

        // A released note pad may still be lit by the sounding chord
        let resting = if self.highlighted.contains(&id) {
            PadColor::Yellow
        } else {
            pad.default_color()
        };
        self.display.set_color(id, resting);
        if !pad.affects_harmony() {
            return;
        }

        let removed = match self.stack.remove(id) {
            Ok(removed) => removed,
            Err(e) => {
                // Out-of-order release from before initialization; a
                // stuck pad would be worse than a dropped event.
                warn!(%e, "ignoring release without matching press");
                return;
            }
        };

        if removed.was_governing {
            self.silence();
            if self.stack.has_chord() {
                self.resound();
            }
        } else if !removed.pad.modifiers().is_empty() && self.stack.has_chord() {
            self.resound();
        }
    }

    /// Stop everything: outstanding notes and highlights. Also the
    /// shutdown flush.
    pub fn all_notes_off(&mut self) {
        self.silence();
    }

    /// Pitches with an outstanding note-on, ascending.
    pub fn sounding(&self) -> Vec<u8> {
        self.sounding.iter().copied().collect()
    }

    /// The chord that would sound right now, modifiers applied.
    pub fn effective_chord(&self) -> Option<Chord> {
        let base = self.stack.current_chord()?;
        let modifiers = self.stack.current_modifiers();
        Some(Modifier::apply_all(base, &modifiers))
    }

    // --- internals --------------------------------------------------------

    /// Re-sound the governing chord with the active modifiers applied.
    fn resound(&mut self) {
        let Some(chord) = self.effective_chord() else {
            return;
        };

        let pitches = match voicing::voice(
            &chord,
            self.config.center,
            self.config.span,
            self.config.bass_note,
            self.config.voicing,
        ) {
            Ok(pitches) => pitches,
            Err(e) => {
                // Unreachable with validated config; keep the pads alive
                warn!(%e, "voicing failed, chord not sounded");
                return;
            }
        };

        self.send_note_offs();

        let velocity = self.last_velocity.max(1);
        for raw in pitches {
            let pitch = match u8::try_from(raw) {
                Ok(p) if p <= 127 => p,
                _ => {
                    debug!(pitch = raw, "dropping out-of-range pitch");
                    continue;
                }
            };
            if let Err(e) = self.sink.note_on(pitch, velocity) {
                warn!(%e, pitch, "note-on failed");
                continue;
            }
            self.sounding.insert(pitch);
        }

        self.update_highlights(Some(&chord));
    }

    /// Note-off everything and clear the highlights.
    fn silence(&mut self) {
        self.send_note_offs();
        self.update_highlights(None);
    }

    fn send_note_offs(&mut self) {
        for pitch in std::mem::take(&mut self.sounding) {
            if let Err(e) = self.sink.note_off(pitch) {
                warn!(%e, pitch, "note-off failed");
            }
        }
    }

    /// Reconcile lit note pads with the sounding chord's pitch classes.
    fn update_highlights(&mut self, chord: Option<&Chord>) {
        let mut wanted = BTreeSet::new();
        if let Some(chord) = chord {
            for note in chord.pitch_classes() {
                let id_str = HighlightRegistry::id_for(note);
                match self.registry.resolve(&id_str) {
                    Ok(pad_id) => {
                        wanted.insert(pad_id);
                    }
                    Err(e) => warn!(%e, "highlight target missing"),
                }
            }
        }

        for &pad_id in self.highlighted.difference(&wanted) {
            let color = self
                .pads
                .get(&pad_id)
                .map(|p| p.default_color())
                .unwrap_or(PadColor::Black);
            self.display.set_color(pad_id, color);
        }
        for &pad_id in wanted.difference(&self.highlighted) {
            self.display.set_color(pad_id, PadColor::Yellow);
        }
        self.highlighted = wanted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Recorded transport event
    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        On(u8, u8),
        Off(u8),
    }

    #[derive(Default)]
    struct MockSink {
        events: Rc<RefCell<Vec<Sent>>>,
    }

    impl NoteSink for MockSink {
        fn note_on(&mut self, pitch: u8, velocity: u8) -> anyhow::Result<()> {
            assert!(velocity >= 1, "note-on with velocity 0 must never be sent");
            self.events.borrow_mut().push(Sent::On(pitch, velocity));
            Ok(())
        }

        fn note_off(&mut self, pitch: u8) -> anyhow::Result<()> {
            self.events.borrow_mut().push(Sent::Off(pitch));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDisplay {
        colors: Rc<RefCell<HashMap<PadId, PadColor>>>,
    }

    impl PadDisplay for MockDisplay {
        fn set_color(&mut self, pad: PadId, color: PadColor) {
            self.colors.borrow_mut().insert(pad, color);
        }
    }

    struct Rig {
        engine: Engine,
        events: Rc<RefCell<Vec<Sent>>>,
        colors: Rc<RefCell<HashMap<PadId, PadColor>>>,
        chord_pads: Vec<PadId>,
        sus2: PadId,
        add7: PadId,
    }

    fn rig() -> Rig {
        let sink = MockSink::default();
        let display = MockDisplay::default();
        let events = sink.events.clone();
        let colors = display.colors.clone();

        let mut engine = Engine::new(Box::new(sink), Box::new(display));
        let scale = Scale::parse("Cmaj").unwrap();
        let chord_pads = engine.add_chord_row(scale).unwrap();
        let sus2 = engine.add_modifier_pad(Modifier::Sus2);
        let add7 = engine.add_modifier_pad(Modifier::Add7);
        engine.add_note_row();

        Rig {
            engine,
            events,
            colors,
            chord_pads,
            sus2,
            add7,
        }
    }

    #[test]
    fn test_press_sounds_triad() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[0], 100);

        assert_eq!(r.engine.sounding(), vec![48, 52, 55]);
        assert_eq!(
            *r.events.borrow(),
            vec![Sent::On(48, 100), Sent::On(52, 100), Sent::On(55, 100)]
        );
    }

    #[test]
    fn test_release_sends_note_offs() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[0], 100);
        r.events.borrow_mut().clear();

        r.engine.handle_release(r.chord_pads[0], 0);
        assert_eq!(
            *r.events.borrow(),
            vec![Sent::Off(48), Sent::Off(52), Sent::Off(55)]
        );
        assert!(r.engine.sounding().is_empty());
    }

    #[test]
    fn test_modifier_press_resounds() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[0], 100);
        r.engine.handle_press(r.sus2, 64);

        // Sus2: C D G around center C3
        assert_eq!(r.engine.sounding(), vec![48, 50, 55]);
    }

    #[test]
    fn test_modifier_alone_is_silent() {
        let mut r = rig();
        r.engine.handle_press(r.sus2, 100);
        assert!(r.engine.sounding().is_empty());
        assert!(r.events.borrow().is_empty());
    }

    #[test]
    fn test_modifier_release_restores_chord() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[0], 100);
        r.engine.handle_press(r.add7, 100);
        assert_eq!(r.engine.sounding(), vec![48, 52, 55, 59]);

        r.engine.handle_release(r.add7, 0);
        assert_eq!(r.engine.sounding(), vec![48, 52, 55]);
    }

    #[test]
    fn test_second_chord_takes_over_and_release_falls_back() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[0], 100);
        r.engine.handle_press(r.chord_pads[3], 100);
        // IV governs: F3 A3 C4 in root position
        assert_eq!(r.engine.sounding(), vec![53, 57, 60]);

        // Releasing the governing pad falls back to the still-held I
        r.engine.handle_release(r.chord_pads[3], 0);
        assert_eq!(r.engine.sounding(), vec![48, 52, 55]);

        // Releasing the non-governing pad first must not cut the sound
        r.engine.handle_press(r.chord_pads[3], 100);
        r.engine.handle_release(r.chord_pads[0], 0);
        assert_eq!(r.engine.sounding(), vec![53, 57, 60]);
    }

    #[test]
    fn test_release_without_press_is_tolerated() {
        let mut r = rig();
        // Must not panic, must not emit anything
        r.engine.handle_release(r.chord_pads[2], 0);
        assert!(r.events.borrow().is_empty());
    }

    #[test]
    fn test_unknown_pad_ignored() {
        let mut r = rig();
        r.engine.handle_press(PadId(999), 100);
        r.engine.handle_release(PadId(999), 0);
        assert!(r.events.borrow().is_empty());
    }

    #[test]
    fn test_zero_velocity_press_replays_with_last_velocity() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[0], 80);
        r.events.borrow_mut().clear();

        // A zero-velocity press must not produce zero-velocity note-ons
        r.engine.handle_press(r.sus2, 0);
        assert!(r
            .events
            .borrow()
            .iter()
            .all(|e| !matches!(e, Sent::On(_, 0))));
        assert!(r
            .events
            .borrow()
            .iter()
            .any(|e| matches!(e, Sent::On(_, 80))));
    }

    #[test]
    fn test_highlights_follow_chord() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[0], 100);

        let registry = HighlightRegistry::from_pads(r.engine.pads.values());
        let c_pad = registry.resolve("Note: C").unwrap();
        let e_pad = registry.resolve("Note: E").unwrap();
        let d_pad = registry.resolve("Note: D").unwrap();

        assert_eq!(r.colors.borrow()[&c_pad], PadColor::Yellow);
        assert_eq!(r.colors.borrow()[&e_pad], PadColor::Yellow);
        assert_eq!(r.colors.borrow()[&d_pad], PadColor::Black);

        r.engine.handle_release(r.chord_pads[0], 0);
        assert_eq!(r.colors.borrow()[&c_pad], PadColor::Black);
    }

    #[test]
    fn test_press_and_default_colors() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[4], 100);
        assert_eq!(r.colors.borrow()[&r.chord_pads[4]], PadColor::Green);

        r.engine.handle_release(r.chord_pads[4], 0);
        assert_eq!(r.colors.borrow()[&r.chord_pads[4]], PadColor::White);

        // The root-degree pad rests turquoise
        assert_eq!(r.colors.borrow()[&r.chord_pads[0]], PadColor::Turquoise);
    }

    #[test]
    fn test_all_notes_off_flush() {
        let mut r = rig();
        r.engine.handle_press(r.chord_pads[0], 100);
        r.engine.all_notes_off();
        assert!(r.engine.sounding().is_empty());
    }

    #[test]
    fn test_registry_miss_is_non_fatal() {
        let registry = HighlightRegistry::default();
        assert!(matches!(
            registry.resolve("Note: C"),
            Err(PadchordError::RegistryMiss(_))
        ));
    }

    #[test]
    fn test_bank_pad_applies_all_modifiers() {
        let mut r = rig();
        let bank = r
            .engine
            .add_bank_pad(vec![Modifier::Sus4, Modifier::Add7]);
        r.engine.handle_press(r.chord_pads[0], 100);
        r.engine.handle_press(bank, 100);

        // Csus4 add7: C F G B
        assert_eq!(r.engine.sounding(), vec![48, 53, 55, 59]);
    }
}
