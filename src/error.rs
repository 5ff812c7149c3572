// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for padchord.

use thiserror::Error;

/// Errors produced by the harmony engine and its collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PadchordError {
    /// Malformed scale-degree input (non-positive index or bad accidental)
    #[error("Invalid scale degree: {0}")]
    InvalidDegree(String),

    /// Malformed scale name (expected e.g. "Cmaj", "G#min")
    #[error("Invalid scale name: {0}")]
    InvalidScaleName(String),

    /// Voicing span must cover at least one octave
    #[error("Invalid voicing range: {0}")]
    InvalidVoicingRange(i32),

    /// Voicing type name not in the catalogue
    #[error("Unknown voicing type: {0}")]
    UnknownVoicingType(String),

    /// Release without a matching press (tolerated and logged by the engine)
    #[error("Pad stack underflow: release for pad {0} with no matching press")]
    StackUnderflow(u64),

    /// Highlight id not present in the registry (tolerated and logged)
    #[error("Highlight registry miss: {0}")]
    RegistryMiss(String),
}

pub type Result<T> = std::result::Result<T, PadchordError>;
