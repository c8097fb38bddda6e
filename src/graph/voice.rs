//! Voice Synthesis
//!
//! A voice is one oscillator or noise source with a frequency trajectory
//! and a gain envelope, both expressed as breakpoint lists. Voices are
//! scheduled at an absolute graph time and render sample by sample until
//! their envelope runs out.

use std::f32::consts::PI;

/// Floor for exponential ramps; a true zero would stall the curve.
pub const EXP_FLOOR: f32 = 1.0e-4;

/// Oscillator primitive for a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Pure sine
    Sine,
    /// 50% pulse
    Square,
    /// Symmetric triangle
    Triangle,
    /// Rising sawtooth
    Saw,
    /// Uniform noise read from the shared graph buffer
    Noise,
}

/// How a breakpoint is reached from the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    /// Jump to the value at the breakpoint time
    Set,
    /// Linear interpolation from the previous breakpoint
    Linear,
    /// Exponential interpolation (values floored at [`EXP_FLOOR`])
    Exponential,
}

/// One (time offset, value) point on a frequency or gain trajectory
#[derive(Debug, Clone, Copy)]
pub struct Breakpoint {
    /// Seconds after voice start
    pub at: f32,
    /// Target value (Hz or linear gain)
    pub value: f32,
    /// Ramp shape into this point
    pub ramp: Ramp,
}

impl Breakpoint {
    /// Convenience constructor
    pub fn new(at: f32, value: f32, ramp: Ramp) -> Self {
        Breakpoint { at, value, ramp }
    }
}

/// Immutable description of one scheduled voice
#[derive(Debug, Clone)]
pub struct VoiceSpec {
    /// Oscillator primitive
    pub waveform: Waveform,
    /// Absolute graph time at which the voice starts, in seconds
    pub start_at: f64,
    /// Frequency trajectory (ignored for noise voices)
    pub freq: Vec<Breakpoint>,
    /// Gain envelope; the last breakpoint ends the voice
    pub gain: Vec<Breakpoint>,
    /// Optional resonant low-pass cutoff in Hz
    pub lowpass_hz: Option<f32>,
}

impl VoiceSpec {
    /// Voice length in seconds (end of the longest trajectory)
    pub fn duration(&self) -> f32 {
        let freq_end = self.freq.last().map_or(0.0, |b| b.at);
        let gain_end = self.gain.last().map_or(0.0, |b| b.at);
        freq_end.max(gain_end)
    }

    /// Copy of this spec shifted to start at `at` seconds of graph time
    pub fn at(&self, at: f64) -> VoiceSpec {
        let mut spec = self.clone();
        spec.start_at = at;
        spec
    }
}

/// Evaluate a breakpoint trajectory at `t` seconds after voice start.
///
/// Before the first point the first value holds; after the last point the
/// last value holds. `Set` segments hold the previous value until the
/// breakpoint time is reached.
pub fn evaluate(points: &[Breakpoint], t: f32) -> f32 {
    let first = match points.first() {
        Some(p) => p,
        None => return 0.0,
    };
    if t <= first.at {
        return first.value;
    }
    for pair in points.windows(2) {
        let (p0, p1) = (&pair[0], &pair[1]);
        if t < p1.at {
            let span = p1.at - p0.at;
            if span <= 0.0 {
                return p1.value;
            }
            let u = (t - p0.at) / span;
            return match p1.ramp {
                Ramp::Set => p0.value,
                Ramp::Linear => p0.value + (p1.value - p0.value) * u,
                Ramp::Exponential => {
                    let v0 = p0.value.max(EXP_FLOOR);
                    let v1 = p1.value.max(EXP_FLOOR);
                    v0 * (v1 / v0).powf(u)
                }
            };
        }
    }
    points.last().map_or(0.0, |p| p.value)
}

/// Two-pole resonant low-pass (direct form II transposed)
#[derive(Debug, Clone, Copy)]
pub struct BiquadLp {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl BiquadLp {
    /// Create a low-pass section for the given cutoff and Q
    pub fn new(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let w0 = 2.0 * PI * (cutoff / sample_rate).clamp(0.0, 0.49);
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q.max(0.1));
        let a0 = 1.0 + alpha;
        BiquadLp {
            b0: ((1.0 - cos_w0) * 0.5) / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: ((1.0 - cos_w0) * 0.5) / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Process one sample
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}

/// A scheduled voice plus its mutable render state
#[derive(Debug, Clone)]
pub struct ActiveVoice {
    spec: VoiceSpec,
    phase: f32,
    noise_pos: usize,
    hp_memory: f32,
    lowpass: Option<BiquadLp>,
    finished: bool,
}

impl ActiveVoice {
    /// Wrap a spec for rendering
    pub fn new(spec: VoiceSpec, sample_rate: f32) -> Self {
        let lowpass = spec.lowpass_hz.map(|c| BiquadLp::new(c, 0.8, sample_rate));
        ActiveVoice {
            spec,
            phase: 0.0,
            noise_pos: 0,
            hp_memory: 0.0,
            lowpass,
            finished: false,
        }
    }

    /// Whether the voice has played out and can be retired
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Absolute graph time at which the voice starts
    pub fn start_at(&self) -> f64 {
        self.spec.start_at
    }

    /// Render the sample at absolute graph time `t`.
    ///
    /// Returns silence before the scheduled start and after the envelope
    /// ends; marks the voice finished once past its end.
    pub fn sample(&mut self, t: f64, noise: &[f32], sample_rate: f32) -> f32 {
        let rel = (t - self.spec.start_at) as f32;
        if rel < 0.0 {
            return 0.0;
        }
        if rel > self.spec.duration() {
            self.finished = true;
            return 0.0;
        }

        let gain = evaluate(&self.spec.gain, rel);
        let raw = match self.spec.waveform {
            Waveform::Noise => {
                let x = noise[self.noise_pos];
                self.noise_pos = (self.noise_pos + 1) % noise.len();
                // One-pole high-pass keeps the noise bright for hats
                self.hp_memory += 0.05 * (x - self.hp_memory);
                x - self.hp_memory
            }
            wave => {
                let freq = evaluate(&self.spec.freq, rel);
                self.phase = (self.phase + freq / sample_rate).fract();
                oscillate(wave, self.phase)
            }
        };

        let shaped = match self.lowpass.as_mut() {
            Some(filter) => filter.process(raw),
            None => raw,
        };
        shaped * gain
    }
}

fn oscillate(wave: Waveform, phase: f32) -> f32 {
    match wave {
        Waveform::Sine => (2.0 * PI * phase).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        Waveform::Saw => 2.0 * phase - 1.0,
        Waveform::Noise => 0.0,
    }
}
