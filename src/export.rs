//! Offline WAV Export
//!
//! Renders effect recipes and music loops through the same graph code
//! the real-time path uses, then writes 16-bit mono WAV. Handy for
//! auditioning recipe tweaks without a device and for regression-checking
//! the audio output of a fixed seed.

use crate::graph::{AudioGraph, SAMPLE_RATE};
use crate::sequencer::patterns::{self, DifficultyTier, TrackStyle};
use crate::sequencer::{SequencerCore, STEPS_PER_BAR};
use crate::synth::{self, EffectKind};
use crate::{AudioEngineError, Result};
use std::path::Path;
use std::sync::Arc;

/// Decay allowance after the last scheduled event
const TAIL_SECONDS: f64 = 0.4;

const BLOCK_FRAMES: usize = 1024;

/// Noise seed for effect rendering; recipes are otherwise deterministic
const EFFECT_SEED: u64 = 0x51e5;

fn render_out(graph: &AudioGraph, seconds: f64) -> Vec<f32> {
    let total = (seconds * SAMPLE_RATE as f64).ceil() as usize;
    let mut samples = Vec::with_capacity(total);
    let mut block = [0.0f32; BLOCK_FRAMES];
    while samples.len() < total {
        graph.render(&mut block);
        let take = (total - samples.len()).min(BLOCK_FRAMES);
        samples.extend_from_slice(&block[..take]);
    }
    samples
}

/// Render one effect to samples
pub fn render_effect(kind: EffectKind) -> Vec<f32> {
    let graph = AudioGraph::with_seed(EFFECT_SEED);
    synth::play(&graph, kind);
    let seconds = synth::recipe(kind).duration() + TAIL_SECONDS;
    render_out(&graph, seconds)
}

/// Render `bars` bars of the loop for a (style, tier) combination.
///
/// The seed fixes the lead-note draws and the noise buffer, so equal
/// arguments produce bit-identical audio.
pub fn render_loop(style: TrackStyle, tier: DifficultyTier, bars: usize, seed: u64) -> Vec<f32> {
    let graph = AudioGraph::with_seed(seed);
    let mut core = SequencerCore::new(Arc::clone(&graph), seed);
    core.begin(style, tier, 0.0);
    for _ in 0..bars * STEPS_PER_BAR {
        core.schedule_step();
    }
    let spp = patterns::resolve(style, tier).seconds_per_step();
    let seconds = (bars * STEPS_PER_BAR) as f64 * spp + TAIL_SECONDS;
    render_out(&graph, seconds)
}

/// Render one effect straight to a WAV file
pub fn render_effect_wav(kind: EffectKind, path: impl AsRef<Path>) -> Result<()> {
    write_wav(path, &render_effect(kind))
}

/// Render a music loop straight to a WAV file
pub fn render_loop_wav(
    style: TrackStyle,
    tier: DifficultyTier,
    bars: usize,
    seed: u64,
    path: impl AsRef<Path>,
) -> Result<()> {
    write_wav(path, &render_loop(style, tier, bars, seed))
}

fn write_wav(path: impl AsRef<Path>, samples: &[f32]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| AudioEngineError::Other(format!("WAV write error: {e}")))?;
    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(quantized)
            .map_err(|e| AudioEngineError::Other(format!("WAV write error: {e}")))?;
    }
    writer
        .finalize()
        .map_err(|e| AudioEngineError::Other(format!("WAV write error: {e}")))?;
    Ok(())
}
