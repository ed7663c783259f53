//! Vertical player physics
//!
//! Semi-implicit Euler at one step per tick: velocity first, then position.

use super::state::Player;
use crate::tuning::Tuning;

/// Advance the player by one tick of gravity, clamped between the top of the
/// viewport and the ground.
pub fn step_player(player: &mut Player, tuning: &Tuning) {
    player.vel_y += tuning.gravity;
    player.pos.y += player.vel_y;

    if player.pos.y >= player.ground_y {
        player.pos.y = player.ground_y;
        player.vel_y = 0.0;
        player.airborne = false;
    } else if player.pos.y < 0.0 {
        // Ceiling: only reachable with extreme tuning
        player.pos.y = 0.0;
        player.vel_y = player.vel_y.max(0.0);
    }
}

/// Start a jump. Returns false (and changes nothing) while airborne.
pub fn jump(player: &mut Player, tuning: &Tuning) -> bool {
    if player.airborne {
        return false;
    }
    player.vel_y = tuning.jump_power;
    player.airborne = true;
    true
}
