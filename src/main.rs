// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padchord::config::SessionFile;
use padchord::engine::{Engine, NoteSink, PadDisplay};
use padchord::midi::{print_ports, MidirSink};
use padchord::music::{Chord, Modifier, Scale};
use padchord::session::{PadColor, PadId};
use padchord::voicing::{voice, VoicingType};

fn print_usage() {
    println!("PADCHORD - Chord-Pad Harmony Engine");
    println!();
    println!("Usage: padchord [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list-midi                        List available MIDI output ports");
    println!("  --chord <SCALE> <DEGREE> [MOD..]   Print the voiced chord (e.g. Cmaj 5 sus4)");
    println!("  --play <PORT> <SCALE> <DEGREE> [MOD..]");
    println!("                                     Send the voiced chord to MIDI port PORT");
    println!("  --demo <PORT>                      Play a short scripted pad session on PORT");
    println!("  --check-config <FILE>              Validate a YAML session file");
    println!("  --voicing <NAME>                   Voicing: root, wrap, bass, guitar (default root)");
    println!("  --center <PITCH>                   Voicing center (default 48, C3)");
    println!("  --span <OCTAVES>                   Octave span (default 1)");
    println!("  --bass                             Add a bass note an octave below the root");
    println!("  --help                             Show this help message");
}

/// Voicing flags shared by --chord and --play.
struct VoicingArgs {
    voicing: VoicingType,
    center: i32,
    span: i32,
    bass_note: bool,
}

impl VoicingArgs {
    /// Consume recognized flags from the tail of the argument list,
    /// returning what remains (scale, degree, modifiers).
    fn parse(args: &[String]) -> Result<(Self, Vec<String>)> {
        let mut parsed = Self {
            voicing: VoicingType::Root,
            center: 48,
            span: 1,
            bass_note: false,
        };
        let mut rest = Vec::new();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--voicing" => {
                    let value = flag_value(args, i, "--voicing")?;
                    parsed.voicing = VoicingType::from_name(value)?;
                    i += 2;
                }
                "--center" => {
                    let value = flag_value(args, i, "--center")?;
                    parsed.center = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid center pitch: {}", value))?;
                    i += 2;
                }
                "--span" => {
                    let value = flag_value(args, i, "--span")?;
                    parsed.span = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid span: {}", value))?;
                    i += 2;
                }
                "--bass" => {
                    parsed.bass_note = true;
                    i += 1;
                }
                _ => {
                    rest.push(args[i].clone());
                    i += 1;
                }
            }
        }
        Ok((parsed, rest))
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))
}

/// Build the chord named by positional arguments: scale, degree, then
/// any number of modifier names applied in order.
fn build_chord(positional: &[String]) -> Result<Chord> {
    if positional.len() < 2 {
        anyhow::bail!("Expected <SCALE> <DEGREE> [MODIFIER..], e.g. Cmaj 5 sus4");
    }
    let scale = Scale::parse(&positional[0])?;
    let degree: u16 = positional[1]
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid degree: {}", positional[1]))?;
    let chord = Chord::new(scale, degree)?;

    let mut modifiers = Vec::new();
    for name in &positional[2..] {
        modifiers.push(
            Modifier::from_name(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown modifier: {}", name))?,
        );
    }
    Ok(Modifier::apply_all(&chord, &modifiers))
}

fn show_chord(args: &[String]) -> Result<()> {
    let (voicing_args, positional) = VoicingArgs::parse(args)?;
    let chord = build_chord(&positional)?;

    let pitches = voice(
        &chord,
        voicing_args.center,
        voicing_args.span,
        voicing_args.bass_note,
        voicing_args.voicing,
    )?;

    println!("{}", chord);
    println!("  tones:   {:?}", chord.chromatic_tones());
    println!("  voicing: {} around {}", voicing_args.voicing, voicing_args.center);
    println!("  pitches: {:?}", pitches);
    Ok(())
}

fn play_chord(port: usize, args: &[String]) -> Result<()> {
    let (voicing_args, positional) = VoicingArgs::parse(args)?;
    let chord = build_chord(&positional)?;

    let pitches = voice(
        &chord,
        voicing_args.center,
        voicing_args.span,
        voicing_args.bass_note,
        voicing_args.voicing,
    )?;

    println!("Connecting to MIDI port {}...", port);
    let mut sink = MidirSink::connect(port, 0)?;

    println!("Playing {} ({:?})...", chord, pitches);
    for &pitch in &pitches {
        if let Ok(p) = u8::try_from(pitch) {
            sink.note_on(p, 100)?;
        }
    }

    thread::sleep(Duration::from_millis(1500));

    for &pitch in &pitches {
        if let Ok(p) = u8::try_from(pitch) {
            sink.note_off(p)?;
        }
    }
    sink.all_notes_off()?;

    println!("Done");
    Ok(())
}

/// Display collaborator that narrates color changes to stdout.
struct ConsoleDisplay;

impl PadDisplay for ConsoleDisplay {
    fn set_color(&mut self, pad: PadId, color: PadColor) {
        println!("  [{} -> {}]", pad, color);
    }
}

/// A short scripted session: hold the I chord, layer sus4, move to IV,
/// release everything.
fn run_demo(port: usize) -> Result<()> {
    println!("Connecting to MIDI port {}...", port);
    let sink = MidirSink::connect(port, 0)?;

    let mut engine = Engine::new(Box::new(sink), Box::new(ConsoleDisplay));
    let scale = Scale::parse("Cmaj")?;
    let chords = engine.add_chord_row(scale)?;
    let sus4 = engine.add_modifier_pad(Modifier::Sus4);
    engine.add_note_row();

    let hold = Duration::from_millis(800);

    println!("I");
    engine.handle_press(chords[0], 100);
    thread::sleep(hold);

    println!("I sus4");
    engine.handle_press(sus4, 100);
    thread::sleep(hold);
    engine.handle_release(sus4, 0);

    println!("IV");
    engine.handle_press(chords[3], 100);
    thread::sleep(hold);

    engine.handle_release(chords[3], 0);
    thread::sleep(hold);
    engine.handle_release(chords[0], 0);
    engine.all_notes_off();

    println!("Demo complete");
    Ok(())
}

fn check_config(path: &str) -> Result<()> {
    let file = SessionFile::load(path)?;
    let config = file.validate()?;
    println!("Configuration OK");
    println!("  scale:    {} {}", config.scale.root(), config.scale.quality());
    println!("  voicing:  {} around {}", config.voicing, config.voicing_center);
    println!("  span:     {}", config.span);
    println!("  bass:     {}", config.bass_note);
    println!(
        "  mods:     {}",
        config
            .modifiers
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("padchord=info".parse()?),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("PADCHORD - Chord-Pad Harmony Engine");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--list-midi" => {
            print_ports()?;
        }
        "--chord" => {
            show_chord(&args[2..])?;
        }
        "--play" => {
            if args.len() < 3 {
                eprintln!("Error: --play requires a port number");
                eprintln!("Use --list-midi to see available ports");
                std::process::exit(1);
            }
            let port: usize = args[2]
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid port number: {}", args[2]))?;
            play_chord(port, &args[3..])?;
        }
        "--demo" => {
            if args.len() < 3 {
                eprintln!("Error: --demo requires a port number");
                eprintln!("Use --list-midi to see available ports");
                std::process::exit(1);
            }
            let port: usize = args[2]
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid port number: {}", args[2]))?;
            run_demo(port)?;
        }
        "--check-config" => {
            if args.len() < 3 {
                eprintln!("Error: --check-config requires a file path");
                std::process::exit(1);
            }
            check_config(&args[2])?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
