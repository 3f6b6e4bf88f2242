use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rockfall_common::DirtyBuffers;
use rockfall_kernel::{Rockfall, StepStats};

/// Host-side frame-timing source.
///
/// The kernel never reads a clock. The host owns one of these, calls
/// [`FrameClock::tick`] once per frame and passes the result to
/// `Rockfall::update`.
#[derive(Debug)]
pub enum FrameClock {
    /// Wall-clock deltas between consecutive ticks.
    Realtime { last: Instant },
    /// The same delta every tick, for headless and deterministic runs.
    Fixed { dt: f32 },
}

impl FrameClock {
    pub fn realtime() -> Self {
        Self::Realtime {
            last: Instant::now(),
        }
    }

    pub fn fixed(dt: f32) -> Self {
        Self::Fixed { dt }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        match self {
            Self::Realtime { last } => {
                let now = Instant::now();
                let dt = now.duration_since(*last).as_secs_f32();
                *last = now;
                dt
            }
            Self::Fixed { dt } => *dt,
        }
    }
}

/// One timed simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateSample {
    pub duration: Duration,
    pub stats: StepStats,
}

/// Times `Rockfall::update` over a sliding window of recent steps.
///
/// Skipped updates (stopped effect, degenerate delta) are counted but not
/// sampled. Respawns are totalled over the whole run.
#[derive(Debug)]
pub struct UpdateTimer {
    samples: VecDeque<UpdateSample>,
    window: usize,
    skipped: u64,
    respawned: u64,
}

impl UpdateTimer {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            skipped: 0,
            respawned: 0,
        }
    }

    /// Run one update on `effect` and record how long it took.
    pub fn time(&mut self, effect: &mut Rockfall, dt: f32) -> DirtyBuffers {
        let start = Instant::now();
        let dirty = effect.update(dt);
        let duration = start.elapsed();

        if dirty.is_clean() {
            self.skipped += 1;
            return dirty;
        }
        let stats = effect.last_step();
        self.respawned += stats.respawned as u64;
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(UpdateSample { duration, stats });
        dirty
    }

    pub fn samples(&self) -> impl Iterator<Item = &UpdateSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Respawns across every step timed so far, not just the window.
    pub fn respawned(&self) -> u64 {
        self.respawned
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.samples.iter().map(|s| s.duration).sum::<Duration>() / self.samples.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.samples
            .iter()
            .map(|s| s.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Mean cost of stepping a single particle over the window.
    pub fn per_particle(&self) -> Duration {
        let particles: usize = self
            .samples
            .iter()
            .map(|s| s.stats.alive + s.stats.dormant)
            .sum();
        if particles == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().map(|s| s.duration).sum();
        Duration::from_nanos((total.as_nanos() / particles as u128) as u64)
    }

    /// Live particle count after the most recent timed step.
    pub fn last_alive(&self) -> Option<usize> {
        self.samples.back().map(|s| s.stats.alive)
    }
}
