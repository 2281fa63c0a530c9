//! Fixed-shooter simulation core.
//!
//! Modules:
//! - `entities`: entity records, the factory and the fixed-slot game state
//! - `movement`: ship clamping, bullet flight and firing
//! - `swarm`: enemy sweep direction, descent and speed ramp
//! - `collision`: bullet/enemy hit detection and destruction
//! - `compute`: input commands and the single fixed-step update
//! - `game_loop`: lag accumulator, frame pacing and the adapter seams
//! - `config`: tunables and compile-time capacities

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod game_loop;
pub mod movement;
pub mod swarm;

pub use config::GameConfig;
pub use entities::{Entity, GameState, Scene};
pub use error::{ConfigError, StartupError};
pub use swarm::{SweepDirection, SweepPolicy, SwarmController};
