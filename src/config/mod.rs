// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for the harmony engine.
//!
//! Loads a YAML session file describing the scale, the voicing setup and
//! the modifier pad layout. Parsing is eager: a malformed scale name or
//! voicing type fails at load time, not on the first pad press.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::music::modifier::Modifier;
use crate::music::scale::Scale;
use crate::voicing::VoicingType;

/// On-disk session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionFile {
    /// Scale name, e.g. "Cmaj", "G#min"
    #[serde(default = "default_scale")]
    pub scale: String,
    /// Voicing algorithm name ("root", "wrap", "bass", "guitar")
    #[serde(default = "default_voicing")]
    pub voicing: String,
    /// Absolute pitch the voicing clusters around (MIDI convention, C3 = 48)
    #[serde(default = "default_voicing_center")]
    pub voicing_center: i32,
    /// Octave span of the voicing
    #[serde(default = "default_span")]
    pub span: i32,
    /// Add a bass note an octave below the voiced root
    #[serde(default)]
    pub bass_note: bool,
    /// Modifier pads to lay out, in surface order
    #[serde(default = "default_modifiers")]
    pub modifiers: Vec<String>,
    /// MIDI channel (0-15)
    #[serde(default)]
    pub channel: u8,
}

fn default_scale() -> String {
    "Cmaj".to_string()
}

fn default_voicing() -> String {
    "root".to_string()
}

fn default_voicing_center() -> i32 {
    48 // C3
}

fn default_span() -> i32 {
    1
}

fn default_modifiers() -> Vec<String> {
    Modifier::ALL.iter().map(|m| m.name().to_string()).collect()
}

impl Default for SessionFile {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            voicing: default_voicing(),
            voicing_center: default_voicing_center(),
            span: default_span(),
            bass_note: false,
            modifiers: default_modifiers(),
            channel: 0,
        }
    }
}

impl SessionFile {
    /// Load a session configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a session configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Resolve all names into domain types, surfacing every error now.
    pub fn validate(&self) -> Result<SessionConfig> {
        let scale = Scale::parse(&self.scale)?;
        let voicing = VoicingType::from_name(&self.voicing)?;
        if self.span <= 0 {
            anyhow::bail!("span must be positive, got {}", self.span);
        }
        if self.channel > 15 {
            anyhow::bail!("MIDI channel must be 0-15, got {}", self.channel);
        }

        let mut modifiers = Vec::with_capacity(self.modifiers.len());
        for name in &self.modifiers {
            let modifier = Modifier::from_name(name)
                .with_context(|| format!("Unknown modifier: {}", name))?;
            modifiers.push(modifier);
        }

        Ok(SessionConfig {
            scale,
            voicing,
            voicing_center: self.voicing_center,
            span: self.span,
            bass_note: self.bass_note,
            modifiers,
            channel: self.channel,
        })
    }
}

/// Validated configuration with domain types resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub scale: Scale,
    pub voicing: VoicingType,
    pub voicing_center: i32,
    pub span: i32,
    pub bass_note: bool,
    pub modifiers: Vec<Modifier>,
    pub channel: u8,
}
