//! Ship and bullet motion, plus firing into the bullet pool.

use crate::entities::{Entity, GameState};

// ── Ship ──────────────────────────────────────────────────────────────────────

/// Step left unless already at or past the left edge.
///
/// The bound is checked before stepping, so it is a floor on where a move
/// may start, not an exact stop at zero.
pub fn move_left(ship: &mut Entity, step: f32) {
    if ship.position.x <= 0.0 {
        return;
    }
    ship.position.x -= step;
}

/// Step right unless the right edge already touches `playfield_width`.
pub fn move_right(ship: &mut Entity, step: f32, playfield_width: f32) {
    if ship.position.x >= playfield_width - ship.size().w {
        return;
    }
    ship.position.x += step;
}

// ── Bullets ───────────────────────────────────────────────────────────────────

/// Whether a bullet slot may be claimed by a new shot.
pub fn is_free_slot(bullet: &Entity) -> bool {
    bullet.position.y <= 0.0
}

/// Move a bullet up by `speed`; a bullet fully above the top edge stays put.
pub fn advance_bullet(bullet: &mut Entity, speed: f32) {
    if bullet.position.y <= -bullet.size().h {
        return;
    }
    bullet.position.y -= speed;
}

/// Spawn a bullet at the ship's horizontal centre in the first free slot.
///
/// Returns the claimed slot index, or `None` when every slot is in flight
/// (the request is dropped).
pub fn fire(state: &mut GameState) -> Option<usize> {
    let ship = &state.ship;
    let x = ship.position.x + ship.size().w / 2.0;
    let y = ship.position.y;

    let Some(index) = state.bullets.iter().position(is_free_slot) else {
        log::debug!("fire dropped: all {} slots in flight", state.bullets.len());
        return None;
    };
    let bullet = &mut state.bullets[index];
    bullet.respawn(x, y);
    log::debug!("{} fired from {} slot {index} at ({x}, {y})", bullet.label, ship.label);
    Some(index)
}
