//! All game entity types and the fixed-slot game state.
//!
//! Entities live in fixed-capacity arrays and are never removed: a destroyed
//! or spent entity is marked invisible and parked off the playfield, so every
//! slot always holds a valid value.

use crate::config::{
    GameConfig, BULLET_CAPACITY, BULLET_HEIGHT, BULLET_WIDTH, ENEMY_COLS, ENEMY_HEIGHT,
    ENEMY_ORIGIN, ENEMY_ROWS, ENEMY_SPACING, ENEMY_WIDTH, INITIAL_HEALTH, OFF_PLAYFIELD,
    SHIP_BOTTOM_OFFSET, SHIP_HEIGHT, SHIP_START_X, SHIP_WIDTH,
};
use crate::swarm::SwarmController;

pub const SHIP_LABEL: &str = "ship";
pub const ENEMY_LABEL: &str = "enemy";
pub const BULLET_LABEL: &str = "bullet";

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Top-left anchor.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub position: Position,
    size: Size,
    /// Set at creation; no rule reads or changes it.
    pub health: f32,
    /// Diagnostic tag only; never used for dispatch.
    pub label: String,
    pub visible: bool,
}

impl Entity {
    /// Fixed for the life of the entity.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Bottom-right corner, inclusive.
    pub fn far_corner(&self) -> Position {
        Position {
            x: self.position.x + self.size.w,
            y: self.position.y + self.size.h,
        }
    }

    /// Reinitialise a reused slot in place, keeping its size and label.
    pub fn respawn(&mut self, x: f32, y: f32) {
        self.position = Position { x, y };
        self.health = INITIAL_HEALTH;
        self.visible = true;
    }

    /// Whether any part of the entity overlaps a `width` × `height` playfield.
    pub fn on_playfield(&self, width: f32, height: f32) -> bool {
        let far = self.far_corner();
        far.x > 0.0 && far.y > 0.0 && self.position.x < width && self.position.y < height
    }
}

/// Entity factory: full health, visible, owning its own copy of `label`.
pub fn create(label: &str, x: f32, y: f32, w: f32, h: f32) -> Entity {
    Entity {
        position: Position { x, y },
        size: Size { w, h },
        health: INITIAL_HEALTH,
        label: label.to_owned(),
        visible: true,
    }
}

/// A bullet slot that is free for reuse and not drawn.
pub fn empty_bullet() -> Entity {
    let mut bullet = create(BULLET_LABEL, 0.0, OFF_PLAYFIELD, BULLET_WIDTH, BULLET_HEIGHT);
    bullet.visible = false;
    bullet
}

// ── Master game state ─────────────────────────────────────────────────────────

pub type EnemyGrid = [[Entity; ENEMY_COLS]; ENEMY_ROWS];
pub type BulletPool = [Entity; BULLET_CAPACITY];

#[derive(Clone, Debug)]
pub struct GameState {
    pub ship: Entity,
    pub enemies: EnemyGrid,
    pub bullets: BulletPool,
    pub running: bool,
    pub swarm: SwarmController,
}

impl GameState {
    /// Ship at its start position, full enemy grid, empty bullet pool.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            ship: create(
                SHIP_LABEL,
                SHIP_START_X,
                config.playfield_height - SHIP_BOTTOM_OFFSET,
                SHIP_WIDTH,
                SHIP_HEIGHT,
            ),
            enemies: std::array::from_fn(|row| {
                std::array::from_fn(|col| {
                    create(
                        ENEMY_LABEL,
                        ENEMY_ORIGIN + col as f32 * ENEMY_SPACING,
                        ENEMY_ORIGIN + row as f32 * ENEMY_SPACING,
                        ENEMY_WIDTH,
                        ENEMY_HEIGHT,
                    )
                })
            }),
            bullets: std::array::from_fn(|_| empty_bullet()),
            running: true,
            swarm: SwarmController::new(config.initial_sweep_speed),
        }
    }

    pub fn enemies_remaining(&self) -> usize {
        self.enemies.iter().flatten().filter(|e| e.visible).count()
    }

    pub fn bullets_in_flight(&self) -> usize {
        self.bullets.iter().filter(|b| b.position.y > 0.0).count()
    }

    /// Read-only view handed to a render sink for one draw call.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            ship: &self.ship,
            bullets: &self.bullets,
            enemies: &self.enemies,
            swarm: &self.swarm,
        }
    }
}

/// Borrowed snapshot of everything drawable.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    pub ship: &'a Entity,
    pub bullets: &'a BulletPool,
    pub enemies: &'a EnemyGrid,
    pub swarm: &'a SwarmController,
}

impl<'a> Scene<'a> {
    /// Every slot in draw order: ship, bullets, then enemies row by row.
    pub fn entities(&self) -> impl Iterator<Item = &'a Entity> {
        let ship: &'a Entity = self.ship;
        let bullets: &'a BulletPool = self.bullets;
        let enemies: &'a EnemyGrid = self.enemies;
        std::iter::once(ship)
            .chain(bullets.iter())
            .chain(enemies.iter().flatten())
    }
}
