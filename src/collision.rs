//! Bullet ↔ enemy hit detection.
//!
//! A hit is the bullet's top-left anchor falling inside the enemy rectangle,
//! bounds inclusive.  This is a point test, not rectangle overlap: a bullet
//! grazing an enemy with its right or bottom edge does not count.

use crate::config::OFF_PLAYFIELD;
use crate::entities::{BulletPool, EnemyGrid, Entity, Position};

/// Inclusive on all four sides.
pub fn point_in_rect(point: Position, rect: &Entity) -> bool {
    let far = rect.far_corner();
    point.x >= rect.position.x && point.x <= far.x && point.y >= rect.position.y && point.y <= far.y
}

pub fn destroy_enemy(enemy: &mut Entity) {
    enemy.position = Position {
        x: OFF_PLAYFIELD,
        y: OFF_PLAYFIELD,
    };
    enemy.visible = false;
}

/// Park a bullet above the playfield so its slot becomes free.
pub fn retire_bullet(bullet: &mut Entity) {
    bullet.position.y = OFF_PLAYFIELD;
}

/// One resolution pass over every (enemy, bullet) pair.
///
/// Invisible enemies are tested like any other.  A bullet is not consumed
/// after its first hit within the pass, so overlapping enemies can all be
/// destroyed by the same bullet.  Returns the number of hits.
pub fn resolve(enemies: &mut EnemyGrid, bullets: &mut BulletPool) -> usize {
    let mut hits = 0;
    for (row, cells) in enemies.iter_mut().enumerate() {
        for (col, enemy) in cells.iter_mut().enumerate() {
            for (slot, bullet) in bullets.iter_mut().enumerate() {
                if !point_in_rect(bullet.position, enemy) {
                    continue;
                }
                log::info!(
                    "{} [{row}][{col}] destroyed by {} in slot {slot}",
                    enemy.label,
                    bullet.label
                );
                destroy_enemy(enemy);
                retire_bullet(bullet);
                hits += 1;
            }
        }
    }
    hits
}
