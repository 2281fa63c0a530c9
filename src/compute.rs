//! Game-logic entry points.
//!
//! `apply_command` handles one discrete input action immediately;
//! `step` advances everything time-driven by exactly one fixed step.  Both
//! mutate the state's slots in place and cannot fail.

use crate::collision;
use crate::config::GameConfig;
use crate::entities::GameState;
use crate::movement::{advance_bullet, fire, move_left, move_right};

// ── Input signals & commands ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Left,
    Right,
    Space,
}

/// One discrete event from the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSignal {
    Quit,
    KeyDown(Key),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Fire,
    Quit,
}

pub fn command_for(signal: InputSignal) -> Command {
    match signal {
        InputSignal::Quit | InputSignal::KeyDown(Key::Escape) => Command::Quit,
        InputSignal::KeyDown(Key::Left) => Command::MoveLeft,
        InputSignal::KeyDown(Key::Right) => Command::MoveRight,
        InputSignal::KeyDown(Key::Space) => Command::Fire,
    }
}

// ── Input-driven transitions ──────────────────────────────────────────────────

/// Apply a command now, without time scaling.
pub fn apply_command(state: &mut GameState, command: Command, config: &GameConfig) {
    match command {
        Command::MoveLeft => move_left(&mut state.ship, config.ship_step),
        Command::MoveRight => {
            move_right(&mut state.ship, config.ship_step, config.playfield_width)
        }
        Command::Fire => {
            fire(state);
        }
        Command::Quit => {
            if state.running {
                log::info!("quit requested");
            }
            state.running = false;
        }
    }
}

// ── Fixed step ────────────────────────────────────────────────────────────────

/// What happened during one fixed step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub flips: u32,
    pub hits: usize,
}

/// Bullets, then the swarm, then collisions.
pub fn step(state: &mut GameState, config: &GameConfig) -> StepReport {
    for bullet in state.bullets.iter_mut() {
        advance_bullet(bullet, config.bullet_speed);
    }
    let flips = state.swarm.step(&mut state.enemies, config);
    let hits = collision::resolve(&mut state.enemies, &mut state.bullets);
    StepReport { flips, hits }
}
