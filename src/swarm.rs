//! Enemy swarm sweep: shared direction, descent on boundary hits and the
//! monotonic speed ramp.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::entities::{Entity, EnemyGrid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SweepDirection {
    #[default]
    Left,
    Right,
}

impl SweepDirection {
    pub fn flipped(self) -> Self {
        match self {
            SweepDirection::Left => SweepDirection::Right,
            SweepDirection::Right => SweepDirection::Left,
        }
    }

    fn sign(self) -> f32 {
        match self {
            SweepDirection::Left => -1.0,
            SweepDirection::Right => 1.0,
        }
    }
}

/// How boundary hits are evaluated within one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPolicy {
    /// Enemies are checked and moved one at a time in row-major order; the
    /// first boundary hit flips the direction for every enemy scanned after it.
    /// The enemy that hit the left edge moves right at once, while one that hit
    /// the right edge finishes its move to the right.
    #[default]
    InOrder,
    /// The flip decision is taken from pre-step positions and the whole grid
    /// moves with one direction.
    Snapshot,
}

/// Sweep state shared by the whole enemy grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SwarmController {
    direction: SweepDirection,
    speed: f32,
    descents: u32,
}

impl SwarmController {
    pub fn new(initial_speed: f32) -> Self {
        Self {
            direction: SweepDirection::Left,
            speed: initial_speed,
            descents: 0,
        }
    }

    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    /// Never decreases.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Boundary-triggered descents so far.
    pub fn descents(&self) -> u32 {
        self.descents
    }

    /// Advance the grid by one fixed step.  Returns how many times the
    /// direction flipped.
    pub fn step(&mut self, enemies: &mut EnemyGrid, config: &GameConfig) -> u32 {
        match config.sweep_policy {
            SweepPolicy::InOrder => self.step_in_order(enemies, config),
            SweepPolicy::Snapshot => self.step_snapshot(enemies, config),
        }
    }

    fn step_in_order(&mut self, enemies: &mut EnemyGrid, config: &GameConfig) -> u32 {
        let mut flips = 0;
        for row in 0..enemies.len() {
            for col in 0..enemies[row].len() {
                let direction = self.direction;
                if hits_boundary(&enemies[row][col], direction, config.playfield_width) {
                    self.flip(enemies, config, row, col);
                    flips += 1;
                }
                // A left-edge hit turns the enemy around before it moves; a
                // right-edge hit is checked after the move, so only enemies
                // scanned later head left.
                let heading = match direction {
                    SweepDirection::Left => self.direction,
                    SweepDirection::Right => SweepDirection::Right,
                };
                let enemy = &mut enemies[row][col];
                enemy.position.x += heading.sign() * self.speed;
            }
        }
        flips
    }

    fn step_snapshot(&mut self, enemies: &mut EnemyGrid, config: &GameConfig) -> u32 {
        let first_hit = enemies.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|e| hits_boundary(e, self.direction, config.playfield_width))
                .map(|col| (row, col))
        });
        let flips = match first_hit {
            Some((row, col)) => {
                self.flip(enemies, config, row, col);
                1
            }
            None => 0,
        };
        let dx = self.direction.sign() * self.speed;
        for enemy in enemies.iter_mut().flatten() {
            enemy.position.x += dx;
        }
        flips
    }

    fn flip(&mut self, enemies: &mut EnemyGrid, config: &GameConfig, row: usize, col: usize) {
        self.direction = self.direction.flipped();
        self.descend(enemies, config);
        log::debug!(
            "{} [{row}][{col}] hit the edge: sweeping {:?} at speed {:.2}",
            enemies[row][col].label,
            self.direction,
            self.speed
        );
    }

    /// Drop every enemy one row; the speed ramps once per cell touched.
    fn descend(&mut self, enemies: &mut EnemyGrid, config: &GameConfig) {
        for enemy in enemies.iter_mut().flatten() {
            enemy.position.y += config.descent_step;
            self.speed += config.sweep_speed_increment;
        }
        self.descents += 1;
    }
}

/// Whether a visible enemy's leading edge is at or past its boundary.
fn hits_boundary(enemy: &Entity, direction: SweepDirection, playfield_width: f32) -> bool {
    if !enemy.visible {
        return false;
    }
    match direction {
        SweepDirection::Left => enemy.position.x <= 0.0,
        SweepDirection::Right => enemy.position.x >= playfield_width - enemy.size().w,
    }
}
