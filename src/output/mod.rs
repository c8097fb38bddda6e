//! Real-time Audio Output
//!
//! Bridges the audio graph to the default output device via rodio. The
//! device pulls blocks from the graph, which is what advances the audio
//! clock; without an open device the clock stands still and the engine
//! is silent but otherwise fully functional.

use crate::graph::AudioGraph;
use crate::{AudioEngineError, Result};
use rodio::{OutputStream, Sink, Source};
use std::sync::Arc;
use std::time::Duration;

/// Frames rendered per pull from the graph
const BLOCK_FRAMES: usize = 512;

/// Endless rodio source that mixes the graph timeline
pub struct GraphSource {
    graph: Arc<AudioGraph>,
    block: Vec<f32>,
    pos: usize,
}

impl GraphSource {
    /// Create a source over the shared graph
    pub fn new(graph: Arc<AudioGraph>) -> Self {
        GraphSource {
            graph,
            block: vec![0.0; BLOCK_FRAMES],
            pos: BLOCK_FRAMES,
        }
    }
}

impl Iterator for GraphSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.block.len() {
            self.graph.render(&mut self.block);
            self.pos = 0;
        }
        let sample = self.block[self.pos];
        self.pos += 1;
        Some(sample)
    }
}

impl Source for GraphSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.graph.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Open output device driving the graph
pub struct OutputHandle {
    // The stream must outlive the sink or playback stops
    _stream: OutputStream,
    sink: Sink,
}

impl OutputHandle {
    /// Open the default output device and start pulling from the graph
    pub fn open(graph: Arc<AudioGraph>) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioEngineError::AudioDevice(e.to_string()))?;
        let sink =
            Sink::try_new(&handle).map_err(|e| AudioEngineError::AudioDevice(e.to_string()))?;
        sink.append(GraphSource::new(graph));
        sink.play();
        Ok(OutputHandle {
            _stream: stream,
            sink,
        })
    }

    /// Whether the sink is still draining the graph
    pub fn is_running(&self) -> bool {
        !self.sink.is_paused()
    }
}
