//! Sound-Effect Synthesizer
//!
//! Maps symbolic game events to fixed multi-voice synthesis recipes.
//! Every recipe is deterministic: the same event always produces the same
//! breakpoint trajectories. Multi-voice recipes stagger their voices to
//! build chords, arpeggios and glissandi from single oscillators.

use crate::graph::{AudioGraph, Breakpoint, Ramp, VoiceSpec, Waveform};

/// Symbolic sound-effect events the game can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// UI tap feedback
    Click,
    /// Right answer chime (ascending arpeggio)
    Correct,
    /// Wrong answer buzz (descending glide)
    Wrong,
    /// Level cleared fanfare
    Win,
    /// Level failed glissando
    Lose,
    /// Hint revealed ping
    Hint,
    /// Locked level thud
    Lock,
}

impl EffectKind {
    /// All effect kinds, in a stable order
    pub const ALL: [EffectKind; 7] = [
        EffectKind::Click,
        EffectKind::Correct,
        EffectKind::Wrong,
        EffectKind::Win,
        EffectKind::Lose,
        EffectKind::Hint,
        EffectKind::Lock,
    ];

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Click => "click",
            EffectKind::Correct => "correct",
            EffectKind::Wrong => "wrong",
            EffectKind::Win => "win",
            EffectKind::Lose => "lose",
            EffectKind::Hint => "hint",
            EffectKind::Lock => "lock",
        }
    }

    /// Parse a name produced by [`EffectKind::as_str`]
    pub fn from_str(value: &str) -> Option<Self> {
        EffectKind::ALL
            .into_iter()
            .find(|k| k.as_str() == value.to_ascii_lowercase())
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed synthesis recipe: voices with start offsets relative to zero
#[derive(Debug, Clone)]
pub struct EffectRecipe {
    /// Voices to schedule; `start_at` holds the per-voice offset
    pub voices: Vec<VoiceSpec>,
}

impl EffectRecipe {
    /// End of the latest voice, in seconds from the trigger
    pub fn duration(&self) -> f64 {
        self.voices
            .iter()
            .map(|v| v.start_at + v.duration() as f64)
            .fold(0.0, f64::max)
    }
}

/// Schedule the recipe for `kind` at the graph's current time.
///
/// The caller is responsible for the sfx-enabled check; this function
/// always allocates voices.
pub fn play(graph: &AudioGraph, kind: EffectKind) {
    let now = graph.current_time();
    for voice in recipe(kind).voices {
        let offset = voice.start_at;
        graph.schedule(voice.at(now + offset));
    }
}

fn set(at: f32, value: f32) -> Breakpoint {
    Breakpoint::new(at, value, Ramp::Set)
}

fn lin(at: f32, value: f32) -> Breakpoint {
    Breakpoint::new(at, value, Ramp::Linear)
}

fn exp(at: f32, value: f32) -> Breakpoint {
    Breakpoint::new(at, value, Ramp::Exponential)
}

/// Flat frequency held for `dur` seconds
fn flat(hz: f32, dur: f32) -> Vec<Breakpoint> {
    vec![set(0.0, hz), lin(dur, hz)]
}

/// Percussive envelope: fast linear attack, exponential decay to silence
fn pluck(level: f32, dur: f32) -> Vec<Breakpoint> {
    vec![set(0.0, 0.0), lin(0.005, level), exp(dur, 0.001)]
}

fn note(waveform: Waveform, offset: f64, hz: f32, level: f32, dur: f32) -> VoiceSpec {
    VoiceSpec {
        waveform,
        start_at: offset,
        freq: flat(hz, dur),
        gain: pluck(level, dur),
        lowpass_hz: None,
    }
}

fn glide(waveform: Waveform, offset: f64, from_hz: f32, to_hz: f32, level: f32, dur: f32) -> VoiceSpec {
    VoiceSpec {
        waveform,
        start_at: offset,
        freq: vec![set(0.0, from_hz), exp(dur, to_hz)],
        gain: pluck(level, dur),
        lowpass_hz: None,
    }
}

/// Fixed synthesis recipe for a symbolic event
pub fn recipe(kind: EffectKind) -> EffectRecipe {
    let voices = match kind {
        // Single short blip
        EffectKind::Click => vec![note(Waveform::Square, 0.0, 800.0, 0.35, 0.05)],

        // Ascending C major arpeggio: C5 E5 G5
        EffectKind::Correct => vec![
            note(Waveform::Triangle, 0.0, 523.25, 0.5, 0.25),
            note(Waveform::Triangle, 0.09, 659.25, 0.5, 0.25),
            note(Waveform::Triangle, 0.18, 783.99, 0.5, 0.3),
        ],

        // Detuned downward buzz
        EffectKind::Wrong => vec![
            glide(Waveform::Square, 0.0, 330.0, 165.0, 0.45, 0.35),
            glide(Waveform::Square, 0.0, 311.0, 155.0, 0.3, 0.35),
        ],

        // Fanfare run capped with a held octave dyad
        EffectKind::Win => vec![
            note(Waveform::Triangle, 0.0, 523.25, 0.45, 0.2),
            note(Waveform::Triangle, 0.12, 659.25, 0.45, 0.2),
            note(Waveform::Triangle, 0.24, 783.99, 0.45, 0.2),
            note(Waveform::Triangle, 0.36, 1046.5, 0.5, 0.55),
            note(Waveform::Sine, 0.36, 523.25, 0.35, 0.55),
        ],

        // Three sagging glissandi
        EffectKind::Lose => vec![
            glide(Waveform::Saw, 0.0, 392.0, 196.0, 0.35, 0.4),
            glide(Waveform::Saw, 0.25, 330.0, 165.0, 0.35, 0.4),
            glide(Waveform::Saw, 0.5, 261.63, 130.81, 0.35, 0.5),
        ],

        // Two-note ping
        EffectKind::Hint => vec![
            note(Waveform::Sine, 0.0, 880.0, 0.35, 0.12),
            note(Waveform::Sine, 0.15, 1174.66, 0.35, 0.3),
        ],

        // Dull thud plus a muted noise tick
        EffectKind::Lock => vec![
            glide(Waveform::Square, 0.0, 160.0, 80.0, 0.5, 0.15),
            VoiceSpec {
                waveform: Waveform::Noise,
                start_at: 0.0,
                freq: Vec::new(),
                gain: pluck(0.2, 0.05),
                lowpass_hz: Some(900.0),
            },
        ],
    };
    EffectRecipe { voices }
}
