//! Shared Noise Buffer
//!
//! Percussive voices (hi-hats) read from one precomputed buffer of
//! uniform random samples instead of running an RNG per sample. The
//! buffer is built once when the graph is created and shared by every
//! noise voice for the process lifetime.

use oorandom::Rand32;

/// Noise buffer length in seconds
pub const NOISE_SECONDS: f32 = 2.0;

/// Build `seconds` of uniform noise in [-1, 1) at the given sample rate
pub fn noise_buffer(seed: u64, seconds: f32, sample_rate: u32) -> Vec<f32> {
    let len = (seconds * sample_rate as f32) as usize;
    let mut rng = Rand32::new(seed);
    (0..len).map(|_| rng.rand_float() * 2.0 - 1.0).collect()
}
