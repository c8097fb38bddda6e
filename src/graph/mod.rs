//! Audio Graph
//!
//! The shared real-time audio state: a monotonic sample clock, a timeline
//! of scheduled voices and the precomputed noise buffer. Producers (the
//! effect synthesizer and the step sequencer) push [`VoiceSpec`]s with
//! absolute start times; the renderer mixes whatever is due as the clock
//! advances. Scheduling is never retroactive: once a voice is on the
//! timeline it plays out even if its producer stops.
//!
//! The graph is created once and shared behind an [`Arc`] for the process
//! lifetime. Without an output device the clock simply does not advance,
//! which keeps the engine inert but safe on machines with no audio
//! backend.

pub mod noise;
pub mod voice;

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use voice::{ActiveVoice, Breakpoint, Ramp, VoiceSpec, Waveform};

/// Output sample rate in Hz
pub const SAMPLE_RATE: u32 = 44_100;

/// Headroom applied to the mixed output before clamping
const MASTER_GAIN: f32 = 0.6;

/// Shared audio graph: clock, voice timeline and noise buffer
pub struct AudioGraph {
    timeline: Mutex<Vec<ActiveVoice>>,
    frames_rendered: AtomicU64,
    nodes_created: AtomicU64,
    noise: Vec<f32>,
    sample_rate: u32,
}

impl AudioGraph {
    /// Create a graph with a time-derived noise seed
    pub fn new() -> Arc<Self> {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64)
            .unwrap_or(0x5eed);
        Self::with_seed(seed)
    }

    /// Create a graph with a fixed noise seed (deterministic rendering)
    pub fn with_seed(seed: u64) -> Arc<Self> {
        Arc::new(AudioGraph {
            timeline: Mutex::new(Vec::new()),
            frames_rendered: AtomicU64::new(0),
            nodes_created: AtomicU64::new(0),
            noise: noise::noise_buffer(seed, noise::NOISE_SECONDS, SAMPLE_RATE),
            sample_rate: SAMPLE_RATE,
        })
    }

    /// Sample rate the graph renders at
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current audio-clock time in seconds (frames rendered so far)
    pub fn current_time(&self) -> f64 {
        self.frames_rendered.load(Ordering::Relaxed) as f64 / self.sample_rate as f64
    }

    /// Put a voice on the timeline
    pub fn schedule(&self, spec: VoiceSpec) {
        self.nodes_created.fetch_add(1, Ordering::Relaxed);
        self.timeline
            .lock()
            .push(ActiveVoice::new(spec, self.sample_rate as f32));
    }

    /// Total voices ever scheduled (observable for tests and diagnostics)
    pub fn nodes_created(&self) -> u64 {
        self.nodes_created.load(Ordering::Relaxed)
    }

    /// Voices currently on the timeline (pending or sounding)
    pub fn active_voices(&self) -> usize {
        self.timeline.lock().len()
    }

    /// Mix the next `out.len()` frames into `out` and advance the clock.
    ///
    /// Called by the output device callback, by the offline exporter and
    /// by tests. Finished voices are retired after the block.
    pub fn render(&self, out: &mut [f32]) {
        let sr = self.sample_rate as f64;
        let start_frame = self.frames_rendered.load(Ordering::Relaxed);
        let mut timeline = self.timeline.lock();

        for (i, slot) in out.iter_mut().enumerate() {
            let t = (start_frame + i as u64) as f64 / sr;
            let mut acc = 0.0;
            for voice in timeline.iter_mut() {
                acc += voice.sample(t, &self.noise, self.sample_rate as f32);
            }
            *slot = (acc * MASTER_GAIN).clamp(-1.0, 1.0);
        }

        timeline.retain(|v| !v.finished());
        drop(timeline);
        self.frames_rendered
            .fetch_add(out.len() as u64, Ordering::Relaxed);
    }
}
