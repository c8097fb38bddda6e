//! Pattern Library
//!
//! Declarative tables mapping (track style x difficulty tier) to tempo,
//! kick rhythm, lead timbre and root pitch. Pure lookup, no behavior;
//! unknown persisted names parse to the defaults so a bogus request can
//! never fail.

use crate::graph::Waveform;
use serde::{Deserialize, Serialize};

/// Musical flavor of the background track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackStyle {
    /// Bouncy square-lead default
    #[default]
    Fun,
    /// Driving triangle lead, busier kick
    Adventure,
    /// Slow sine lead, sparse kick
    Chill,
}

impl TrackStyle {
    /// All styles, in a stable order
    pub const ALL: [TrackStyle; 3] = [TrackStyle::Fun, TrackStyle::Adventure, TrackStyle::Chill];

    /// Stable lowercase name used in persisted preferences
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackStyle::Fun => "fun",
            TrackStyle::Adventure => "adventure",
            TrackStyle::Chill => "chill",
        }
    }

    /// Parse a persisted name; unknown values fall back to [`TrackStyle::Fun`]
    pub fn parse(value: &str) -> Self {
        TrackStyle::ALL
            .into_iter()
            .find(|s| s.as_str() == value.trim().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for TrackStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Music intensity tier, normally tied to the game's difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    /// Relaxed tempo
    #[default]
    Easy,
    /// Mid tempo
    Medium,
    /// Fast tempo
    Hard,
}

impl DifficultyTier {
    /// All tiers, in a stable order
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
    ];

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
        }
    }

    /// Parse a name; unknown values fall back to [`DifficultyTier::Easy`]
    pub fn parse(value: &str) -> Self {
        DifficultyTier::ALL
            .into_iter()
            .find(|t| t.as_str() == value.trim().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (style, tier) entry: everything the sequencer needs for a bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternDefinition {
    /// Tempo in beats per minute
    pub tempo_bpm: f32,
    /// Kick hits over an 8-slot half-note grid
    pub kick_hits: [bool; 8],
    /// Oscillator used for the lead voice
    pub lead_timbre: Waveform,
    /// Root frequency of the lead line in Hz
    pub root_hz: f32,
}

impl PatternDefinition {
    /// Sixteenth-note duration in seconds (60 / bpm / 4)
    pub fn seconds_per_step(&self) -> f64 {
        60.0 / self.tempo_bpm as f64 / 4.0
    }
}

const T: bool = true;
const F: bool = false;

static FUN_EASY: PatternDefinition = PatternDefinition {
    tempo_bpm: 110.0,
    kick_hits: [T, F, F, F, T, F, F, F],
    lead_timbre: Waveform::Square,
    root_hz: 220.0,
};
static FUN_MEDIUM: PatternDefinition = PatternDefinition {
    tempo_bpm: 120.0,
    kick_hits: [T, F, F, F, T, F, T, F],
    lead_timbre: Waveform::Square,
    root_hz: 220.0,
};
static FUN_HARD: PatternDefinition = PatternDefinition {
    tempo_bpm: 132.0,
    kick_hits: [T, F, T, F, T, F, T, F],
    lead_timbre: Waveform::Square,
    root_hz: 246.94,
};

static ADVENTURE_EASY: PatternDefinition = PatternDefinition {
    tempo_bpm: 100.0,
    kick_hits: [T, F, F, T, F, F, T, F],
    lead_timbre: Waveform::Triangle,
    root_hz: 196.0,
};
static ADVENTURE_MEDIUM: PatternDefinition = PatternDefinition {
    tempo_bpm: 112.0,
    kick_hits: [T, F, F, T, T, F, T, F],
    lead_timbre: Waveform::Triangle,
    root_hz: 196.0,
};
static ADVENTURE_HARD: PatternDefinition = PatternDefinition {
    tempo_bpm: 124.0,
    kick_hits: [T, F, T, T, T, F, T, F],
    lead_timbre: Waveform::Saw,
    root_hz: 220.0,
};

static CHILL_EASY: PatternDefinition = PatternDefinition {
    tempo_bpm: 84.0,
    kick_hits: [T, F, F, F, F, F, T, F],
    lead_timbre: Waveform::Sine,
    root_hz: 174.61,
};
static CHILL_MEDIUM: PatternDefinition = PatternDefinition {
    tempo_bpm: 92.0,
    kick_hits: [T, F, F, F, T, F, F, F],
    lead_timbre: Waveform::Sine,
    root_hz: 174.61,
};
static CHILL_HARD: PatternDefinition = PatternDefinition {
    tempo_bpm: 100.0,
    kick_hits: [T, F, F, T, T, F, F, F],
    lead_timbre: Waveform::Triangle,
    root_hz: 196.0,
};

/// Look up the pattern for a (style, tier) combination.
///
/// Total over both enums; combined with the fallback parsing on
/// [`TrackStyle::parse`] and [`DifficultyTier::parse`], any request
/// resolves to a pattern and the (fun, easy) entry is the global default.
pub fn resolve(style: TrackStyle, tier: DifficultyTier) -> &'static PatternDefinition {
    use DifficultyTier::*;
    use TrackStyle::*;
    match (style, tier) {
        (Fun, Easy) => &FUN_EASY,
        (Fun, Medium) => &FUN_MEDIUM,
        (Fun, Hard) => &FUN_HARD,
        (Adventure, Easy) => &ADVENTURE_EASY,
        (Adventure, Medium) => &ADVENTURE_MEDIUM,
        (Adventure, Hard) => &ADVENTURE_HARD,
        (Chill, Easy) => &CHILL_EASY,
        (Chill, Medium) => &CHILL_MEDIUM,
        (Chill, Hard) => &CHILL_HARD,
    }
}
