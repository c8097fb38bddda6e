//! Step Sequencer
//!
//! Generates the looping background music in real time. A coarse 25 ms
//! timer wakes the scheduler, which pre-commits every step falling inside
//! a 0.1 s lookahead window at exact audio-clock times. Playback is
//! sample-accurate no matter how much the timer jitters, as long as the
//! timer period stays below the lookahead window.
//!
//! Stopping cancels only future scheduling; voices already on the graph
//! timeline play out (at most one lookahead window of committed audio).

pub mod kit;
pub mod patterns;
pub mod task;

use crate::graph::AudioGraph;
use oorandom::Rand32;
use parking_lot::Mutex;
use patterns::{DifficultyTier, PatternDefinition, TrackStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use task::TickTask;

/// How far ahead of the audio clock steps are pre-committed, in seconds
pub const LOOKAHEAD_SECONDS: f64 = 0.1;

/// Wakeup period of the scheduling timer; must stay below the lookahead
pub const TICK_PERIOD: Duration = Duration::from_millis(25);

/// Sixteenth-note steps in one bar
pub const STEPS_PER_BAR: usize = 16;

/// Ratios the lead voice picks from, relative to the pattern root.
/// 1.5 appears twice so the fifth is drawn more often.
pub const LEAD_INTERVALS: [f32; 6] = [1.0, 1.25, 1.5, 1.33, 1.5, 2.0];

/// Which instruments fire on a given step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTriggers {
    /// Kick drum
    pub kick: bool,
    /// Hi-hat
    pub hat: bool,
    /// Bass note one octave below root
    pub bass: bool,
    /// Lead voice
    pub lead: bool,
}

/// Instrument triggers for `step` (0..16) under the given pattern.
///
/// Kick follows the pattern's 8-slot grid (`step mod 8`), hats fill the
/// offbeats, bass marks the two half-bar downbeats, and the lead plays a
/// fixed five-note rhythm whose pitches are randomized elsewhere.
pub fn triggers_for_step(pattern: &PatternDefinition, step: usize) -> StepTriggers {
    StepTriggers {
        kick: pattern.kick_hits[step % 8],
        hat: step % 2 == 1,
        bass: step == 0 || step == 8,
        lead: matches!(step, 0 | 3 | 6 | 9 | 12),
    }
}

/// Scheduler state: owned by the sequencer, mutated only under its lock
pub(crate) struct SequencerCore {
    graph: Arc<AudioGraph>,
    rng: Rand32,
    playing: bool,
    style: TrackStyle,
    tier: DifficultyTier,
    step: usize,
    next_time: f64,
}

impl SequencerCore {
    pub(crate) fn new(graph: Arc<AudioGraph>, seed: u64) -> Self {
        SequencerCore {
            graph,
            rng: Rand32::new(seed),
            playing: false,
            style: TrackStyle::default(),
            tier: DifficultyTier::default(),
            step: 0,
            next_time: 0.0,
        }
    }

    /// Reset to step 0 at `now` and mark playing
    pub(crate) fn begin(&mut self, style: TrackStyle, tier: DifficultyTier, now: f64) {
        self.playing = true;
        self.style = style;
        self.tier = tier;
        self.step = 0;
        self.next_time = now;
    }

    /// Schedule every step due inside the lookahead window
    pub(crate) fn fill_lookahead(&mut self, now: f64) {
        while self.next_time < now + LOOKAHEAD_SECONDS {
            self.schedule_step();
        }
    }

    /// Schedule the current step's hits, then advance one sixteenth
    pub(crate) fn schedule_step(&mut self) {
        let pattern = patterns::resolve(self.style, self.tier);
        let at = self.next_time;
        let triggers = triggers_for_step(pattern, self.step);

        if triggers.kick {
            self.graph.schedule(kit::kick(at));
        }
        if triggers.hat {
            self.graph.schedule(kit::hat(at));
        }
        if triggers.bass {
            self.graph.schedule(kit::bass(at, pattern.root_hz));
        }
        if triggers.lead {
            let idx = self.rng.rand_range(0..LEAD_INTERVALS.len() as u32) as usize;
            let hz = pattern.root_hz * LEAD_INTERVALS[idx];
            self.graph.schedule(kit::lead(at, hz, pattern.lead_timbre));
        }

        self.step = (self.step + 1) % STEPS_PER_BAR;
        self.next_time += pattern.seconds_per_step();
    }
}

/// Observable sequencer state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerSnapshot {
    /// Whether a scheduling loop is active
    pub playing: bool,
    /// Active track style
    pub style: TrackStyle,
    /// Active difficulty tier
    pub tier: DifficultyTier,
    /// Next step index to schedule (mod 16)
    pub step: usize,
    /// Audio-clock time of the next unscheduled step
    pub next_time: f64,
}

/// The background-music sequencer
///
/// Owns the scheduler state and the recurring tick task. At most one
/// tick task is alive at a time: starting over a running loop joins the
/// old task before the new one spawns.
pub struct Sequencer {
    core: Arc<Mutex<SequencerCore>>,
    task: Option<TickTask>,
    live_loops: Arc<AtomicUsize>,
}

impl Sequencer {
    /// Create a stopped sequencer with a time-derived lead seed
    pub fn new(graph: Arc<AudioGraph>) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64)
            .unwrap_or(0xbea7);
        Self::with_seed(graph, seed)
    }

    /// Create a stopped sequencer with a fixed lead-note seed
    pub fn with_seed(graph: Arc<AudioGraph>, seed: u64) -> Self {
        Sequencer {
            core: Arc::new(Mutex::new(SequencerCore::new(graph, seed))),
            task: None,
            live_loops: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start (or restart) the loop for a style and tier.
    ///
    /// A no-op when already playing the same combination. A different
    /// combination cancels the running loop first and restarts at step 0.
    pub fn start(&mut self, style: TrackStyle, tier: DifficultyTier) {
        {
            let core = self.core.lock();
            if core.playing && core.style == style && core.tier == tier {
                return;
            }
        }
        self.stop();
        {
            let mut core = self.core.lock();
            let now = core.graph.current_time();
            core.begin(style, tier, now);
        }

        let core = Arc::clone(&self.core);
        self.task = Some(TickTask::spawn(
            TICK_PERIOD,
            Arc::clone(&self.live_loops),
            move || {
                let mut core = core.lock();
                if core.playing {
                    let now = core.graph.current_time();
                    core.fill_lookahead(now);
                }
            },
        ));
    }

    /// Cancel the tick task and mark stopped.
    ///
    /// Safe when already stopped. Voices already scheduled keep playing.
    pub fn stop(&mut self) {
        self.task = None;
        self.core.lock().playing = false;
    }

    /// Whether a scheduling loop is active
    pub fn is_playing(&self) -> bool {
        self.core.lock().playing
    }

    /// Snapshot of the scheduler state
    pub fn snapshot(&self) -> SequencerSnapshot {
        let core = self.core.lock();
        SequencerSnapshot {
            playing: core.playing,
            style: core.style,
            tier: core.tier,
            step: core.step,
            next_time: core.next_time,
        }
    }

    /// Number of live tick loops; 0 or 1 by construction
    pub fn active_loops(&self) -> usize {
        self.live_loops.load(Ordering::SeqCst)
    }

    /// Run one scheduling pass now, without waiting for the timer.
    ///
    /// The tick task does exactly this every period; calling it directly
    /// is useful for offline rendering and deterministic tests.
    pub fn pump(&self) {
        let mut core = self.core.lock();
        if core.playing {
            let now = core.graph.current_time();
            core.fill_lookahead(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AudioGraph;

    fn fun_easy() -> &'static PatternDefinition {
        patterns::resolve(TrackStyle::Fun, DifficultyTier::Easy)
    }

    #[test]
    fn test_trigger_grid_fun_easy() {
        let pattern = fun_easy();
        for step in 0..STEPS_PER_BAR {
            let t = triggers_for_step(pattern, step);
            assert_eq!(t.kick, matches!(step, 0 | 4 | 8 | 12), "kick at {step}");
            assert_eq!(t.hat, step % 2 == 1, "hat at {step}");
            assert_eq!(t.bass, step == 0 || step == 8, "bass at {step}");
            assert_eq!(t.lead, matches!(step, 0 | 3 | 6 | 9 | 12), "lead at {step}");
        }
    }

    #[test]
    fn test_core_fill_schedules_one_step_per_window() {
        // fun/easy: seconds_per_step = 60/110/4 ~ 0.136 > lookahead 0.1,
        // so a fill at a frozen clock commits exactly one step
        let graph = AudioGraph::with_seed(1);
        let mut core = SequencerCore::new(Arc::clone(&graph), 7);
        core.begin(TrackStyle::Fun, DifficultyTier::Easy, 0.0);
        core.fill_lookahead(0.0);
        assert_eq!(core.step, 1);
        // step 0 fires kick, bass and lead but no hat
        assert_eq!(graph.nodes_created(), 3);
        // repeated fills at the same clock are no-ops
        core.fill_lookahead(0.0);
        assert_eq!(graph.nodes_created(), 3);
    }

    #[test]
    fn test_core_schedules_full_bar() {
        let graph = AudioGraph::with_seed(1);
        let mut core = SequencerCore::new(Arc::clone(&graph), 7);
        core.begin(TrackStyle::Fun, DifficultyTier::Easy, 0.0);
        for _ in 0..STEPS_PER_BAR {
            core.schedule_step();
        }
        assert_eq!(core.step, 0);
        // 4 kicks + 8 hats + 2 bass + 5 leads
        assert_eq!(graph.nodes_created(), 19);
        let spp = fun_easy().seconds_per_step();
        assert!((core.next_time - 16.0 * spp).abs() < 1e-9);
    }

    #[test]
    fn test_start_same_tier_is_idempotent() {
        let graph = AudioGraph::with_seed(1);
        let mut seq = Sequencer::with_seed(Arc::clone(&graph), 7);
        seq.start(TrackStyle::Fun, DifficultyTier::Easy);
        seq.pump();
        let first = seq.snapshot();
        let nodes = graph.nodes_created();

        seq.start(TrackStyle::Fun, DifficultyTier::Easy);
        seq.pump();
        assert_eq!(seq.snapshot(), first);
        assert_eq!(graph.nodes_created(), nodes);
        assert_eq!(seq.active_loops(), 1);
    }

    #[test]
    fn test_start_different_tier_restarts_from_step_zero() {
        let graph = AudioGraph::with_seed(1);
        let mut seq = Sequencer::with_seed(Arc::clone(&graph), 7);
        seq.start(TrackStyle::Fun, DifficultyTier::Easy);
        seq.pump();
        let nodes_before = graph.nodes_created();

        seq.start(TrackStyle::Fun, DifficultyTier::Hard);
        seq.pump();
        let snap = seq.snapshot();
        assert_eq!(snap.tier, DifficultyTier::Hard);
        // restarted at step 0; with the clock frozen exactly one step is
        // committed, so the next unscheduled step is 1 and next_time is
        // one hard-tier sixteenth after the restart
        assert_eq!(snap.step, 1);
        let spp = patterns::resolve(TrackStyle::Fun, DifficultyTier::Hard).seconds_per_step();
        assert!((snap.next_time - spp).abs() < 1e-9);
        assert!(graph.nodes_created() > nodes_before);
        assert_eq!(seq.active_loops(), 1, "old loop leaked");
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let graph = AudioGraph::with_seed(1);
        let mut seq = Sequencer::with_seed(graph, 7);
        seq.stop();
        seq.stop();
        assert!(!seq.is_playing());
        assert_eq!(seq.active_loops(), 0);
    }

    #[test]
    fn test_stop_cancels_loop_but_not_committed_audio() {
        let graph = AudioGraph::with_seed(1);
        let mut seq = Sequencer::with_seed(Arc::clone(&graph), 7);
        seq.start(TrackStyle::Chill, DifficultyTier::Easy);
        seq.pump();
        let committed = graph.active_voices();
        assert!(committed > 0);
        seq.stop();
        assert!(!seq.is_playing());
        assert_eq!(seq.active_loops(), 0);
        // already-scheduled voices stay on the timeline
        assert_eq!(graph.active_voices(), committed);
    }

    #[test]
    fn test_same_seed_gives_same_schedule() {
        // Lead pitches are random per trigger, but a fixed seed must make
        // the whole bar reproducible (the audio output is seed-stable)
        let render = |seed: u64| {
            let graph = AudioGraph::with_seed(1);
            let mut core = SequencerCore::new(Arc::clone(&graph), seed);
            core.begin(TrackStyle::Fun, DifficultyTier::Easy, 0.0);
            for _ in 0..STEPS_PER_BAR {
                core.schedule_step();
            }
            let mut block = vec![0.0f32; 44_100];
            graph.render(&mut block);
            block
        };
        assert_eq!(render(99), render(99));
    }
}
