use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use invaders::compute::{InputSignal, Key};
use invaders::config::GameConfig;
use invaders::entities::{GameState, Scene};
use invaders::game_loop::*;

// ── Test doubles ──────────────────────────────────────────────────────────────

/// Millisecond clock that only moves when slept on or when a sink does work.
#[derive(Clone, Default)]
struct FakeClock {
    now: Rc<Cell<u64>>,
    sleeps: Vec<u64>,
}

impl Clock for FakeClock {
    fn ticks_ms(&self) -> u64 {
        self.now.get()
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.sleeps.push(ms);
        self.now.set(self.now.get() + ms);
    }
}

/// One batch of signals per frame; quits once the script runs out.
struct ScriptedInput {
    frames: VecDeque<Vec<InputSignal>>,
}

impl ScriptedInput {
    fn new(frames: Vec<Vec<InputSignal>>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// `idle` empty frames followed by a frame that quits.
    fn idle_then_quit(idle: usize) -> Self {
        let mut frames = vec![Vec::new(); idle];
        frames.push(vec![InputSignal::Quit]);
        Self::new(frames)
    }
}

impl InputSource for ScriptedInput {
    fn drain(&mut self, out: &mut Vec<InputSignal>) {
        match self.frames.pop_front() {
            Some(batch) => out.extend(batch),
            None => out.push(InputSignal::Quit),
        }
    }
}

/// Records what it was shown; optionally burns clock time or fails.
#[derive(Default)]
struct RecordingSink {
    draws: usize,
    bullet_ys: Vec<f32>,
    ship_xs: Vec<f32>,
    work_ms: u64,
    clock: Option<Rc<Cell<u64>>>,
    fail_on: Option<usize>,
}

impl RenderSink for RecordingSink {
    type Error = String;

    fn draw(&mut self, scene: &Scene<'_>) -> Result<(), String> {
        self.draws += 1;
        if self.fail_on == Some(self.draws) {
            return Err(format!("draw {} failed", self.draws));
        }
        self.bullet_ys.push(scene.bullets[0].position.y);
        self.ship_xs.push(scene.ship.position.x);
        if let Some(now) = &self.clock {
            now.set(now.get() + self.work_ms);
        }
        Ok(())
    }
}

fn run_script(
    input: &mut ScriptedInput,
    sink: &mut RecordingSink,
    clock: &mut FakeClock,
) -> (GameState, Result<LoopStats, String>) {
    let config = GameConfig::default();
    let mut state = GameState::new(&config);
    let result = run(&mut state, &config, input, sink, clock);
    (state, result)
}

// ── Termination ───────────────────────────────────────────────────────────────

#[test]
fn quit_finishes_the_current_frame() {
    let mut input = ScriptedInput::idle_then_quit(0);
    let mut sink = RecordingSink::default();
    let mut clock = FakeClock::default();

    let (state, result) = run_script(&mut input, &mut sink, &mut clock);

    assert!(!state.running);
    assert_eq!(result, Ok(LoopStats { frames: 1, steps: 0, hits: 0 }));
    assert_eq!(sink.draws, 1);
    assert_eq!(clock.sleeps, vec![16]);
}

#[test]
fn escape_key_quits() {
    let mut input = ScriptedInput::new(vec![vec![InputSignal::KeyDown(Key::Escape)]]);
    let mut sink = RecordingSink::default();
    let mut clock = FakeClock::default();
    let (state, result) = run_script(&mut input, &mut sink, &mut clock);
    assert!(!state.running);
    assert_eq!(result.map(|s| s.frames), Ok(1));
}

// ── Fixed-step accounting ─────────────────────────────────────────────────────

#[test]
fn sixteen_ms_frames_accumulate_lag() {
    // First frame sees no elapsed time; each later frame sees the 16 ms slept.
    let mut input = ScriptedInput::idle_then_quit(10);
    let mut sink = RecordingSink::default();
    let mut clock = FakeClock::default();

    let (_, result) = run_script(&mut input, &mut sink, &mut clock);
    let stats = result.expect("loop failed");

    assert_eq!(stats.frames, 11);
    // 10 × 16 ms = 0.16 s of lag → 9 whole 1/60 s steps.
    assert_eq!(stats.steps, 9);
    assert!(clock.sleeps.iter().all(|&ms| ms == 16));
    assert_eq!(clock.sleeps.len(), 11);
}

#[test]
fn slow_frames_skip_the_sleep() {
    let mut clock = FakeClock::default();
    let mut sink = RecordingSink {
        work_ms: 40,
        clock: Some(clock.now.clone()),
        ..RecordingSink::default()
    };
    let mut input = ScriptedInput::idle_then_quit(4);

    let (_, result) = run_script(&mut input, &mut sink, &mut clock);
    let stats = result.expect("loop failed");

    assert!(clock.sleeps.is_empty());
    assert_eq!(stats.frames, 5);
    // 4 × 40 ms = 0.16 s → 9 steps, several per frame.
    assert_eq!(stats.steps, 9);
}

#[test]
fn bullet_advances_once_per_fixed_step() {
    let mut frames = vec![vec![InputSignal::KeyDown(Key::Space)]];
    frames.extend(vec![Vec::new(); 10]);
    let mut input = ScriptedInput::new(frames);
    let mut sink = RecordingSink::default();
    let mut clock = FakeClock::default();

    let (state, result) = run_script(&mut input, &mut sink, &mut clock);
    let stats = result.expect("loop failed");

    // Fired in frame one, before any step ran.
    assert_eq!(sink.bullet_ys[0], 550.0);
    let expected = 550.0 - 10.0 * stats.steps as f32;
    assert_eq!(state.bullets[0].position.y, expected);
    assert_eq!(sink.bullet_ys.last().copied(), Some(expected));
}

#[test]
fn each_key_event_is_one_move() {
    let left = InputSignal::KeyDown(Key::Left);
    let right = InputSignal::KeyDown(Key::Right);
    let mut input = ScriptedInput::new(vec![vec![right, right, right], vec![left], vec![]]);
    let mut sink = RecordingSink::default();
    let mut clock = FakeClock::default();

    run_script(&mut input, &mut sink, &mut clock).1.expect("loop failed");

    assert_eq!(&sink.ship_xs[..3], &[50.0, 40.0, 40.0]);
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[test]
fn draw_failure_stops_the_loop() {
    let mut input = ScriptedInput::idle_then_quit(10);
    let mut sink = RecordingSink {
        fail_on: Some(3),
        ..RecordingSink::default()
    };
    let mut clock = FakeClock::default();

    let (state, result) = run_script(&mut input, &mut sink, &mut clock);

    assert_eq!(result, Err("draw 3 failed".to_string()));
    assert_eq!(sink.draws, 3);
    // The loop bailed out rather than quitting normally.
    assert!(state.running);
}

// ── SystemClock ───────────────────────────────────────────────────────────────

#[test]
fn system_clock_is_monotonic() {
    let mut clock = SystemClock::new();
    let start = clock.ticks_ms();
    clock.sleep_ms(2);
    assert!(clock.ticks_ms() >= start + 2);
}
