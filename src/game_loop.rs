//! Outer render cycle and inner fixed-step cycle.
//!
//! Each frame drains input and applies it immediately, adds the elapsed wall
//! time to the lag budget, runs as many fixed steps as the lag covers, hands
//! a read-only scene to the render sink, then sleeps out the rest of the
//! frame budget.  `running` is only checked at the top of a frame.

use std::time::{Duration, Instant};

use crate::compute::{apply_command, command_for, step, InputSignal};
use crate::config::GameConfig;
use crate::entities::{GameState, Scene};

// ── Collaborator seams ────────────────────────────────────────────────────────

pub trait InputSource {
    /// Append every signal received since the last call.  Must not block.
    fn drain(&mut self, out: &mut Vec<InputSignal>);
}

pub trait RenderSink {
    type Error;

    /// Draw one frame.  The scene is only valid for the duration of the call.
    fn draw(&mut self, scene: &Scene<'_>) -> Result<(), Self::Error>;
}

/// Monotonic millisecond ticks plus a blocking wait.
pub trait Clock {
    fn ticks_ms(&self) -> u64;
    fn sleep_ms(&mut self, ms: u64);
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn ticks_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

// ── Timing ────────────────────────────────────────────────────────────────────

/// Lag accumulator for the fixed-step cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedStep {
    step: f32,
    lag: f32,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self { step, lag: 0.0 }
    }

    pub fn lag(&self) -> f32 {
        self.lag
    }

    pub fn accumulate(&mut self, delta_seconds: f32) {
        self.lag += delta_seconds;
    }

    /// Take one step out of the lag if enough has built up.
    pub fn consume(&mut self) -> bool {
        if self.lag >= self.step {
            self.lag -= self.step;
            true
        } else {
            false
        }
    }
}

/// Sleep needed to fill the frame budget; `None` once the frame ran over.
pub fn frame_delay(frame_ms: u64, budget_ms: u64) -> Option<u64> {
    (budget_ms > frame_ms).then(|| budget_ms - frame_ms)
}

// ── Loop ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub steps: u64,
    pub hits: u64,
}

/// Run until `state.running` goes false.  Fails only if the sink does.
pub fn run<I, R, C>(
    state: &mut GameState,
    config: &GameConfig,
    input: &mut I,
    sink: &mut R,
    clock: &mut C,
) -> Result<LoopStats, R::Error>
where
    I: InputSource,
    R: RenderSink,
    C: Clock,
{
    let mut accumulator = FixedStep::new(config.time_step());
    let budget_ms = config.frame_budget_ms();
    let mut stats = LoopStats::default();
    let mut signals = Vec::new();
    let mut previous = clock.ticks_ms();

    log::info!(
        "loop started: step {:.4}s, frame budget {budget_ms}ms",
        config.time_step()
    );

    while state.running {
        let current = clock.ticks_ms();
        let delta = current.saturating_sub(previous) as f32 / 1000.0;
        previous = current;

        signals.clear();
        input.drain(&mut signals);
        for signal in signals.iter().copied() {
            apply_command(state, command_for(signal), config);
        }

        accumulator.accumulate(delta);
        while accumulator.consume() {
            let report = step(state, config);
            stats.steps += 1;
            stats.hits += report.hits as u64;
        }

        if let Err(err) = sink.draw(&state.scene()) {
            log::warn!("draw failed after {} frames", stats.frames);
            return Err(err);
        }
        stats.frames += 1;

        let frame_ms = clock.ticks_ms().saturating_sub(current);
        if let Some(ms) = frame_delay(frame_ms, budget_ms) {
            clock.sleep_ms(ms);
        }
    }

    log::info!(
        "loop stopped after {} frames, {} steps, {} hits, {} enemies left",
        stats.frames,
        stats.steps,
        stats.hits,
        state.enemies_remaining()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_leaves_remainder() {
        let mut acc = FixedStep::new(0.25);
        acc.accumulate(0.6);
        assert!(acc.consume());
        assert!(acc.consume());
        assert!(!acc.consume());
        assert!((acc.lag() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn frame_delay_fills_budget() {
        assert_eq!(frame_delay(4, 16), Some(12));
        assert_eq!(frame_delay(0, 16), Some(16));
    }

    #[test]
    fn frame_delay_none_when_over_budget() {
        assert_eq!(frame_delay(16, 16), None);
        assert_eq!(frame_delay(40, 16), None);
    }
}
