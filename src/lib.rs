//! Procedural game-audio engine
//!
//! Generates short synthesized sound effects and a looping procedural
//! background-music pattern in real time. Designed for casual games that
//! want audio without shipping samples: every sound is built from
//! oscillator and noise primitives at runtime.
//!
//! # Features
//! - Seven deterministic sound-effect recipes (clicks, chords, glissandi)
//! - Lookahead step sequencer: sample-accurate scheduling driven by a
//!   coarse 25 ms timer
//! - Pattern library mapping (track style x difficulty tier) to tempo,
//!   kick rhythm, lead timbre and root pitch
//! - Persisted audio preferences with tolerant load and defaults
//!
//! # Crate feature flags
//! - `wav-export` (default): Offline WAV rendering of effects and loops (`export`)
//! - `playback` (opt-in): Real-time audio output (enables optional `rodio` dep)
//!
//! # Quick start
//! ```no_run
//! use jinglebox::{AudioEngine, DifficultyTier, EffectKind};
//!
//! let mut engine = AudioEngine::new("prefs.json");
//! engine.play_effect(EffectKind::Correct);
//! engine.start_music(DifficultyTier::Easy);
//! // ... gameplay ...
//! engine.stop_music();
//! ```
//!
//! # Offline rendering
//! ```no_run
//! # #[cfg(feature = "wav-export")]
//! # {
//! use jinglebox::{export, DifficultyTier, EffectKind, TrackStyle};
//! export::render_effect_wav(EffectKind::Win, "win.wav").unwrap();
//! export::render_loop_wav(TrackStyle::Chill, DifficultyTier::Easy, 2, 7, "loop.wav").unwrap();
//! # }
//! ```

#![warn(missing_docs)]

pub mod engine; // Engine facade (preferences + sequencer + effects)
#[cfg(feature = "wav-export")]
pub mod export; // Offline WAV rendering
pub mod graph; // Audio graph: clock, voice timeline, noise buffer
#[cfg(feature = "playback")]
pub mod output; // Real-time output device
pub mod prefs; // Persisted audio preferences
pub mod sequencer; // Step sequencer and pattern library
pub mod synth; // Sound-effect recipes

/// Error types for audio engine operations
#[derive(thiserror::Error, Debug)]
pub enum AudioEngineError {
    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Preference persistence error
    #[error("Preference error: {0}")]
    Prefs(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for AudioEngineError {
    fn from(msg: String) -> Self {
        AudioEngineError::Other(msg)
    }
}

impl From<&str> for AudioEngineError {
    fn from(msg: &str) -> Self {
        AudioEngineError::Other(msg.to_string())
    }
}

/// Result type for audio engine operations
pub type Result<T> = std::result::Result<T, AudioEngineError>;

// Public API exports
pub use engine::AudioEngine;
pub use graph::{AudioGraph, Waveform, SAMPLE_RATE};
#[cfg(feature = "playback")]
pub use output::OutputHandle;
pub use prefs::{AudioPreferences, PreferenceStore};
pub use sequencer::patterns::{DifficultyTier, PatternDefinition, TrackStyle};
pub use sequencer::Sequencer;
pub use synth::EffectKind;
