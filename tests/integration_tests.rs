// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for PADCHORD
//!
//! These tests verify that multiple components work together correctly.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use padchord::config::SessionFile;
use padchord::engine::{Engine, NoteSink, PadDisplay};
use padchord::music::{Chord, Modifier, Scale, ScaleDegree};
use padchord::session::{PadColor, PadId};
use padchord::voicing::{voice, wrap_to_center, VoicingType};

// Note: Integration tests use the public API of the crate

#[derive(Debug, Clone, PartialEq)]
enum NoteEvent {
    On(u8, u8),
    Off(u8),
}

#[derive(Clone, Default)]
struct RecordingSink {
    events: Rc<RefCell<Vec<NoteEvent>>>,
}

impl NoteSink for RecordingSink {
    fn note_on(&mut self, pitch: u8, velocity: u8) -> anyhow::Result<()> {
        assert!(velocity > 0, "note-on with velocity 0 reached the sink");
        self.events.borrow_mut().push(NoteEvent::On(pitch, velocity));
        Ok(())
    }

    fn note_off(&mut self, pitch: u8) -> anyhow::Result<()> {
        self.events.borrow_mut().push(NoteEvent::Off(pitch));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingDisplay {
    colors: Rc<RefCell<Vec<(PadId, PadColor)>>>,
}

impl PadDisplay for RecordingDisplay {
    fn set_color(&mut self, pad: PadId, color: PadColor) {
        self.colors.borrow_mut().push((pad, color));
    }
}

fn engine_with_recorders() -> (Engine, RecordingSink, RecordingDisplay) {
    let sink = RecordingSink::default();
    let display = RecordingDisplay::default();
    let engine = Engine::new(Box::new(sink.clone()), Box::new(display.clone()));
    (engine, sink, display)
}

/// Test the full pipeline from scale name to sounding pitches
#[test]
fn test_chord_pipeline_end_to_end() {
    // Cmaj degree 1, root voicing around C3: C3 E3 G3
    let scale = Scale::parse("Cmaj").unwrap();
    let chord = Chord::new(scale, 1).unwrap();
    assert_eq!(
        voice(&chord, 48, 1, false, VoicingType::Root).unwrap(),
        vec![48, 52, 55]
    );

    // The same chord through the engine
    let (mut engine, sink, _display) = engine_with_recorders();
    let pads = engine.add_chord_row(scale).unwrap();
    engine.handle_press(pads[0], 100);

    assert_eq!(engine.sounding(), vec![48, 52, 55]);
    assert_eq!(
        *sink.events.borrow(),
        vec![
            NoteEvent::On(48, 100),
            NoteEvent::On(52, 100),
            NoteEvent::On(55, 100)
        ]
    );
}

/// Test a complete held-pad session: chord, layered modifier, chord
/// change, fallback on release
#[test]
fn test_session_flow_with_modifier_and_fallback() {
    let (mut engine, _sink, _display) = engine_with_recorders();
    let scale = Scale::parse("Cmaj").unwrap();
    let pads = engine.add_chord_row(scale).unwrap();
    let sus4 = engine.add_modifier_pad(Modifier::Sus4);

    // Hold I
    engine.handle_press(pads[0], 90);
    assert_eq!(engine.sounding(), vec![48, 52, 55]);

    // Layer sus4: E replaced by F
    engine.handle_press(sus4, 90);
    assert_eq!(engine.sounding(), vec![48, 53, 55]);

    // IV takes over while I stays held; the diatonic 4th above F is B
    engine.handle_press(pads[3], 90);
    assert_eq!(engine.sounding(), vec![53, 59, 60]);

    // Releasing IV falls back to I, sus4 still held
    engine.handle_release(pads[3], 0);
    assert_eq!(engine.sounding(), vec![48, 53, 55]);

    // Releasing sus4 restores the plain triad
    engine.handle_release(sus4, 0);
    assert_eq!(engine.sounding(), vec![48, 52, 55]);

    // Releasing the last chord pad silences everything
    engine.handle_release(pads[0], 0);
    assert!(engine.sounding().is_empty());
}

/// Test that wrapping holds its window invariants for arbitrary inputs
#[test]
fn test_wrap_properties_randomized() {
    let mut rng = StdRng::seed_from_u64(0x9d_c0ffee);

    for _ in 0..50 {
        let pitch: i32 = rng.gen_range(-24..=150);
        let center: i32 = rng.gen_range(24..=96);
        let wrapped = wrap_to_center(pitch, center);

        // Same pitch class
        assert_eq!(
            wrapped.rem_euclid(12),
            pitch.rem_euclid(12),
            "pitch class changed wrapping {} around {}",
            pitch,
            center
        );
        // Inside the octave window biased upward
        assert!(
            wrapped >= center - 5 && wrapped <= center + 6,
            "{} wrapped around {} landed at {}",
            pitch,
            center,
            wrapped
        );
    }
}

/// Test that root voicing preserves the chord shape wherever the center
/// sits
#[test]
fn test_root_voicing_shape_randomized() {
    let mut rng = StdRng::seed_from_u64(42);
    let scale = Scale::parse("Gmaj").unwrap();

    for _ in 0..50 {
        let degree = rng.gen_range(1..=7u16);
        let center = rng.gen_range(36..=72);
        let chord = Chord::new(scale, degree).unwrap();
        let tones = chord.chromatic_tones();
        let voiced = voice(&chord, center, 1, false, VoicingType::Root).unwrap();

        assert_eq!(voiced.len(), tones.len());
        for (i, &p) in voiced.iter().enumerate() {
            assert_eq!(
                p - voiced[0],
                tones[i] - tones[0],
                "shape broken for degree {} around {}",
                degree,
                center
            );
        }
        // The root itself is wrapped to the center
        assert!(voiced[0] >= center - 5 && voiced[0] <= center + 6);
    }
}

/// Test degree arithmetic normalization through the public API
#[test]
fn test_degree_arithmetic_normalization() {
    let five: ScaleDegree = "5".parse().unwrap();
    let flat_three: ScaleDegree = "b3".parse().unwrap();
    assert_eq!(five.index(), 4);
    assert_eq!(flat_three.accidental(), -1);

    // Two sharps carry into the next index
    let a: ScaleDegree = "#3".parse().unwrap();
    let b: ScaleDegree = "#1".parse().unwrap();
    let sum = a + b;
    assert_eq!(sum.index(), 3);
    assert_eq!(sum.accidental(), 0);

    // Octave reduction
    let ninth = ScaleDegree::from_index1(9).unwrap();
    assert_eq!(ninth.in_octave(), 1);
}

/// Test that a validated config file drives the engine
#[test]
fn test_config_drives_engine() {
    let yaml = r#"
scale: "Amin"
voicing: "wrap"
voicing_center: 57
bass_note: true
modifiers: ["sus2", "add7"]
"#;
    let config = SessionFile::from_yaml(yaml).unwrap().validate().unwrap();

    let (mut engine, _sink, _display) = engine_with_recorders();
    engine.set_voicing(config.voicing);
    engine.set_voicing_center(config.voicing_center);
    engine.set_span(config.span).unwrap();
    engine.set_bass_note(config.bass_note);

    let pads = engine.add_chord_row(config.scale).unwrap();
    for modifier in &config.modifiers {
        engine.add_modifier_pad(*modifier);
    }

    engine.handle_press(pads[0], 100);

    // A minor triad wrapped around A2 with a bass note below the root
    let sounding = engine.sounding();
    assert_eq!(sounding[0], 45, "bass note an octave below the root");
    assert!(sounding.contains(&57));
    for &p in &sounding[1..] {
        let p = p as i32;
        assert!(p >= 52 && p <= 63, "pitch {} outside the wrap window", p);
    }
}

/// Test that chord presses light the matching note pads
#[test]
fn test_highlights_follow_the_governing_chord() {
    let (mut engine, _sink, display) = engine_with_recorders();
    let scale = Scale::parse("Cmaj").unwrap();
    let chords = engine.add_chord_row(scale).unwrap();
    let notes = engine.add_note_row();

    display.colors.borrow_mut().clear();
    engine.handle_press(chords[0], 100);

    let colors = display.colors.borrow();
    // C, E and G note pads turn yellow; indices into the chromatic row
    let yellow: Vec<PadId> = colors
        .iter()
        .filter(|(_, c)| *c == PadColor::Yellow)
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(yellow, vec![notes[0], notes[4], notes[7]]);
}

/// Test that stray events leave the engine consistent
#[test]
fn test_stray_events_are_tolerated() {
    let (mut engine, sink, _display) = engine_with_recorders();
    let scale = Scale::parse("Cmaj").unwrap();
    let pads = engine.add_chord_row(scale).unwrap();

    // Release before any press: ignored
    engine.handle_release(pads[2], 0);
    assert!(engine.sounding().is_empty());

    // Unknown pad id: ignored
    engine.handle_press(PadId(9999), 100);
    assert!(engine.sounding().is_empty());

    // The engine still works afterwards
    engine.handle_press(pads[0], 100);
    assert_eq!(engine.sounding(), vec![48, 52, 55]);
    assert!(!sink.events.borrow().is_empty());
}

/// Test that a zero-velocity press replays the last real velocity
#[test]
fn test_zero_velocity_press_replays_last_velocity() {
    let (mut engine, sink, _display) = engine_with_recorders();
    let scale = Scale::parse("Cmaj").unwrap();
    let pads = engine.add_chord_row(scale).unwrap();

    engine.handle_press(pads[0], 80);
    engine.handle_press(pads[1], 0);

    let velocities: Vec<u8> = sink
        .events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            NoteEvent::On(_, v) => Some(*v),
            NoteEvent::Off(_) => None,
        })
        .collect();
    assert!(!velocities.is_empty());
    assert!(velocities.iter().all(|&v| v == 80));
}
