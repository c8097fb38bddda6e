//! End-to-end checks through the public API: an application-style tour of
//! the engine plus offline rendering of a full bar.

use jinglebox::{AudioEngine, DifficultyTier, EffectKind, TrackStyle};

#[test]
fn engine_tour_matches_game_flow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let mut engine = AudioEngine::with_seed(&path, 11);

    // menu: a click, then music for an easy level
    engine.play_effect(EffectKind::Click);
    engine.start_music(DifficultyTier::Easy);
    engine.sequencer().pump();
    assert!(engine.sequencer().is_playing());

    // answer feedback while music keeps running
    let nodes_before = engine.graph().nodes_created();
    engine.play_effect(EffectKind::Correct);
    assert!(engine.graph().nodes_created() > nodes_before);
    assert!(engine.sequencer().is_playing());

    // player switches the track in the settings screen
    engine.set_music_track(TrackStyle::Adventure);
    assert_eq!(engine.sequencer().snapshot().style, TrackStyle::Adventure);

    // back to menu
    engine.stop_music();
    assert!(!engine.sequencer().is_playing());
    assert_eq!(engine.sequencer().active_loops(), 0);

    // settings persist across a relaunch
    drop(engine);
    let engine = AudioEngine::with_seed(&path, 11);
    assert_eq!(engine.preferences().selected_track, TrackStyle::Adventure);
}

#[cfg(feature = "wav-export")]
mod offline {
    use super::*;
    use jinglebox::export;
    use jinglebox::sequencer::patterns;
    use jinglebox::SAMPLE_RATE;

    fn rms(window: &[f32]) -> f32 {
        (window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32).sqrt()
    }

    #[test]
    fn rendered_bar_has_energy_on_every_kick() {
        let samples = export::render_loop(TrackStyle::Fun, DifficultyTier::Easy, 1, 7);
        let spp = patterns::resolve(TrackStyle::Fun, DifficultyTier::Easy).seconds_per_step();
        let window = (0.02 * SAMPLE_RATE as f64) as usize;

        for kick_step in [0usize, 4, 8, 12] {
            let onset = (kick_step as f64 * spp * SAMPLE_RATE as f64) as usize;
            let level = rms(&samples[onset..onset + window]);
            assert!(level > 0.01, "no kick energy at step {kick_step}: {level}");
        }
        assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }

    #[test]
    fn every_effect_renders_cleanly() {
        for kind in EffectKind::ALL {
            let samples = export::render_effect(kind);
            assert!(
                samples.iter().any(|s| s.abs() > 0.005),
                "{kind} rendered silent"
            );
            assert!(samples.len() <= (2.0 * SAMPLE_RATE as f32) as usize);
        }
    }
}
