// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI note transport.
//!
//! Adapts a `midir` output connection to the engine's [`NoteSink`]
//! boundary. The engine itself never touches ports; this module is the
//! only place raw MIDI bytes are assembled.

use anyhow::{bail, Context, Result};
use midir::{MidiOutput, MidiOutputConnection};

use crate::engine::NoteSink;

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;

    /// CC number for All Notes Off
    pub const CC_ALL_NOTES_OFF: u8 = 123;
}

/// Assemble a Note On message.
pub fn note_on_bytes(channel: u8, pitch: u8, velocity: u8) -> [u8; 3] {
    [messages::NOTE_ON | (channel & 0x0F), pitch & 0x7F, velocity & 0x7F]
}

/// Assemble a Note Off message.
pub fn note_off_bytes(channel: u8, pitch: u8) -> [u8; 3] {
    [messages::NOTE_OFF | (channel & 0x0F), pitch & 0x7F, 0]
}

/// Names of the available MIDI output ports.
pub fn list_ports() -> Result<Vec<String>> {
    let output = MidiOutput::new("padchord").context("Failed to open MIDI output")?;
    let mut names = Vec::new();
    for port in output.ports() {
        names.push(
            output
                .port_name(&port)
                .unwrap_or_else(|_| "<unknown>".to_string()),
        );
    }
    Ok(names)
}

/// Print the available MIDI output ports to stdout.
pub fn print_ports() -> Result<()> {
    let names = list_ports()?;
    if names.is_empty() {
        println!("No MIDI output ports available");
        return Ok(());
    }
    println!("MIDI output ports:");
    for (i, name) in names.iter().enumerate() {
        println!("  {}: {}", i, name);
    }
    Ok(())
}

/// A [`NoteSink`] backed by a `midir` output connection.
pub struct MidirSink {
    connection: MidiOutputConnection,
    channel: u8,
}

impl MidirSink {
    /// Connect to an output port by index (as listed by [`list_ports`]).
    pub fn connect(port_index: usize, channel: u8) -> Result<Self> {
        let output = MidiOutput::new("padchord").context("Failed to open MIDI output")?;
        let ports = output.ports();
        let port = ports
            .get(port_index)
            .with_context(|| format!("MIDI output port {} does not exist", port_index))?;
        let connection = output
            .connect(port, "padchord-out")
            .map_err(|e| anyhow::anyhow!("Failed to connect to MIDI port: {}", e))?;
        Ok(Self {
            connection,
            channel: channel & 0x0F,
        })
    }

    /// Send All Notes Off on this sink's channel.
    pub fn all_notes_off(&mut self) -> Result<()> {
        let msg = [
            messages::CONTROL_CHANGE | self.channel,
            messages::CC_ALL_NOTES_OFF,
            0,
        ];
        self.connection
            .send(&msg)
            .map_err(|e| anyhow::anyhow!("Failed to send All Notes Off: {}", e))
    }
}

impl NoteSink for MidirSink {
    fn note_on(&mut self, pitch: u8, velocity: u8) -> Result<()> {
        if velocity == 0 {
            // Velocity 0 means note-off on the wire; refuse instead of
            // silently changing meaning
            bail!("note-on with velocity 0 refused (would be a note-off)");
        }
        self.connection
            .send(&note_on_bytes(self.channel, pitch, velocity))
            .map_err(|e| anyhow::anyhow!("Failed to send Note On: {}", e))
    }

    fn note_off(&mut self, pitch: u8) -> Result<()> {
        self.connection
            .send(&note_off_bytes(self.channel, pitch))
            .map_err(|e| anyhow::anyhow!("Failed to send Note Off: {}", e))
    }
}
