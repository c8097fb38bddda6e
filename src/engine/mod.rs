//! Audio Engine Facade
//!
//! The single object the game talks to. Owns the audio graph, the
//! preference store and the sequencer, so there is exactly one writer
//! for all audio state and no globals. Every operation here is
//! best-effort: audio must never interrupt gameplay, so device failures
//! and persistence failures are swallowed.

use crate::graph::AudioGraph;
use crate::prefs::{AudioPreferences, PreferenceStore};
use crate::sequencer::patterns::{DifficultyTier, TrackStyle};
use crate::sequencer::Sequencer;
use crate::synth::{self, EffectKind};
use std::path::Path;
use std::sync::Arc;

/// Facade over the sound-effect synthesizer, the music sequencer and the
/// persisted preferences
pub struct AudioEngine {
    graph: Arc<AudioGraph>,
    prefs: PreferenceStore,
    sequencer: Sequencer,
    /// Last difficulty tier requested, so re-enabling music can resume
    last_tier: Option<DifficultyTier>,
    #[cfg(feature = "playback")]
    output: Option<crate::output::OutputHandle>,
}

impl AudioEngine {
    /// Create an engine backed by the preference file at `prefs_path`
    pub fn new(prefs_path: impl AsRef<Path>) -> Self {
        let graph = AudioGraph::new();
        let sequencer = Sequencer::new(Arc::clone(&graph));
        Self::assemble(graph, sequencer, prefs_path)
    }

    /// Create an engine with fixed noise and lead seeds (deterministic audio)
    pub fn with_seed(prefs_path: impl AsRef<Path>, seed: u64) -> Self {
        let graph = AudioGraph::with_seed(seed);
        let sequencer = Sequencer::with_seed(Arc::clone(&graph), seed);
        Self::assemble(graph, sequencer, prefs_path)
    }

    fn assemble(
        graph: Arc<AudioGraph>,
        sequencer: Sequencer,
        prefs_path: impl AsRef<Path>,
    ) -> Self {
        AudioEngine {
            graph,
            prefs: PreferenceStore::load(prefs_path),
            sequencer,
            last_tier: None,
            #[cfg(feature = "playback")]
            output: None,
        }
    }

    /// Play a sound effect.
    ///
    /// A no-op (before any voice is allocated) when sound effects are
    /// disabled. Never fails; a missing audio device leaves the voices
    /// scheduled but inaudible.
    pub fn play_effect(&mut self, kind: EffectKind) {
        if !self.prefs.snapshot().sfx_enabled {
            return;
        }
        self.ensure_output();
        synth::play(&self.graph, kind);
    }

    /// Start background music for a difficulty tier.
    ///
    /// Remembers the tier even when music is disabled, so enabling music
    /// later resumes at the right intensity.
    pub fn start_music(&mut self, tier: DifficultyTier) {
        self.last_tier = Some(tier);
        let prefs = self.prefs.snapshot();
        if !prefs.music_enabled {
            return;
        }
        self.ensure_output();
        self.sequencer.start(prefs.selected_track, tier);
    }

    /// Stop background music; committed audio plays out
    pub fn stop_music(&mut self) {
        self.sequencer.stop();
    }

    /// Current preference snapshot
    pub fn preferences(&self) -> AudioPreferences {
        self.prefs.snapshot()
    }

    /// Enable or disable sound effects
    pub fn set_sfx_enabled(&mut self, on: bool) {
        // persistence is best-effort
        let _ = self.prefs.set_sfx_enabled(on);
    }

    /// Enable or disable music; stops or resumes the sequencer
    pub fn set_music_enabled(&mut self, on: bool) {
        let _ = self.prefs.set_music_enabled(on);
        if on {
            if let Some(tier) = self.last_tier {
                self.start_music(tier);
            }
        } else {
            self.sequencer.stop();
        }
    }

    /// Select the background track style; restarts the loop when playing
    pub fn set_music_track(&mut self, style: TrackStyle) {
        let _ = self.prefs.set_track(style);
        if self.sequencer.is_playing() {
            if let Some(tier) = self.last_tier {
                self.sequencer.stop();
                self.sequencer.start(style, tier);
            }
        }
    }

    /// Shared audio graph (rendering, diagnostics)
    pub fn graph(&self) -> &Arc<AudioGraph> {
        &self.graph
    }

    /// The music sequencer
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Attempt to bring up the output device; failure keeps the engine
    /// silent but functional, and the next audible call retries.
    #[cfg(feature = "playback")]
    fn ensure_output(&mut self) {
        if self.output.is_none() {
            self.output = crate::output::OutputHandle::open(Arc::clone(&self.graph)).ok();
        }
    }

    #[cfg(not(feature = "playback"))]
    fn ensure_output(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(dir: &tempfile::TempDir) -> AudioEngine {
        AudioEngine::with_seed(dir.path().join("prefs.json"), 5)
    }

    #[test]
    fn test_disabled_sfx_allocates_no_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.set_sfx_enabled(false);
        eng.play_effect(EffectKind::Correct);
        assert_eq!(eng.graph().nodes_created(), 0);

        eng.set_sfx_enabled(true);
        eng.play_effect(EffectKind::Correct);
        assert!(eng.graph().nodes_created() > 0);
    }

    #[test]
    fn test_music_disabled_blocks_start_but_remembers_tier() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.set_music_enabled(false);
        eng.start_music(DifficultyTier::Medium);
        assert!(!eng.sequencer().is_playing());

        eng.set_music_enabled(true);
        assert!(eng.sequencer().is_playing());
        assert_eq!(eng.sequencer().snapshot().tier, DifficultyTier::Medium);
    }

    #[test]
    fn test_music_toggle_stops_and_resumes_from_step_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.start_music(DifficultyTier::Easy);
        eng.sequencer().pump();
        assert!(eng.sequencer().is_playing());

        eng.set_music_enabled(false);
        assert!(!eng.sequencer().is_playing());
        assert_eq!(eng.sequencer().active_loops(), 0);

        eng.set_music_enabled(true);
        eng.sequencer().pump();
        let snap = eng.sequencer().snapshot();
        assert!(snap.playing);
        // restarted from step 0; one step committed by the pump above
        assert_eq!(snap.step, 1);
        assert_eq!(eng.sequencer().active_loops(), 1);
    }

    #[test]
    fn test_track_switch_restarts_running_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.start_music(DifficultyTier::Hard);
        eng.set_music_track(TrackStyle::Chill);
        let snap = eng.sequencer().snapshot();
        assert!(snap.playing);
        assert_eq!(snap.style, TrackStyle::Chill);
        assert_eq!(snap.tier, DifficultyTier::Hard);
        assert_eq!(eng.sequencer().active_loops(), 1);
    }

    #[test]
    fn test_track_switch_while_stopped_only_updates_prefs() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.set_music_track(TrackStyle::Adventure);
        assert!(!eng.sequencer().is_playing());
        assert_eq!(eng.preferences().selected_track, TrackStyle::Adventure);
    }

    #[test]
    fn test_preferences_survive_engine_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        {
            let mut eng = AudioEngine::with_seed(&path, 5);
            eng.set_music_track(TrackStyle::Adventure);
            eng.set_sfx_enabled(false);
        }
        let eng = AudioEngine::with_seed(&path, 5);
        let prefs = eng.preferences();
        assert_eq!(prefs.selected_track, TrackStyle::Adventure);
        assert!(!prefs.sfx_enabled);
        assert!(prefs.music_enabled);
    }
}
