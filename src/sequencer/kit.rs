//! Instrument Kit
//!
//! Voice builders for the four sequencer instruments. Each returns a
//! [`VoiceSpec`] scheduled at an absolute graph time; the sequencer picks
//! which ones fire on a given step.

use crate::graph::{Breakpoint, Ramp, VoiceSpec, Waveform};

fn set(at: f32, value: f32) -> Breakpoint {
    Breakpoint::new(at, value, Ramp::Set)
}

fn lin(at: f32, value: f32) -> Breakpoint {
    Breakpoint::new(at, value, Ramp::Linear)
}

fn exp(at: f32, value: f32) -> Breakpoint {
    Breakpoint::new(at, value, Ramp::Exponential)
}

/// Kick drum: sine with a fast exponential pitch drop
pub fn kick(at: f64) -> VoiceSpec {
    VoiceSpec {
        waveform: Waveform::Sine,
        start_at: at,
        freq: vec![set(0.0, 120.0), exp(0.12, 40.0)],
        gain: vec![set(0.0, 0.0), lin(0.003, 0.9), exp(0.15, 0.001)],
        lowpass_hz: None,
    }
}

/// Hi-hat: short bright noise burst through a low-pass to tame fizz
pub fn hat(at: f64) -> VoiceSpec {
    VoiceSpec {
        waveform: Waveform::Noise,
        start_at: at,
        freq: Vec::new(),
        gain: vec![set(0.0, 0.0), lin(0.002, 0.3), exp(0.05, 0.001)],
        lowpass_hz: Some(9000.0),
    }
}

/// Bass: one octave below the pattern root, held a little longer
pub fn bass(at: f64, root_hz: f32) -> VoiceSpec {
    let hz = root_hz / 2.0;
    VoiceSpec {
        waveform: Waveform::Triangle,
        start_at: at,
        freq: vec![set(0.0, hz), lin(0.25, hz)],
        gain: vec![set(0.0, 0.0), lin(0.01, 0.55), exp(0.25, 0.001)],
        lowpass_hz: None,
    }
}

/// Lead pluck in the pattern's timbre at the given pitch
pub fn lead(at: f64, hz: f32, timbre: Waveform) -> VoiceSpec {
    VoiceSpec {
        waveform: timbre,
        start_at: at,
        freq: vec![set(0.0, hz), lin(0.18, hz)],
        gain: vec![set(0.0, 0.0), lin(0.005, 0.4), exp(0.18, 0.001)],
        lowpass_hz: None,
    }
}
