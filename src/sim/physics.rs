//! Skier physics and world scrolling

use super::state::{GameState, Player, TrailPoint};
use crate::tuning::Tuning;

/// Apply ascend/gravity, clamp velocity, integrate and clamp to the band
pub fn update_player(player: &mut Player, tuning: &Tuning) {
    let accel = if player.ascending {
        tuning.ascend_accel
    } else {
        tuning.gravity
    };
    player.vel_y = (player.vel_y + accel).clamp(-tuning.movement_speed, tuning.movement_speed);

    player.pos.y = (player.pos.y + player.vel_y)
        .clamp(tuning.min_player_y(), tuning.max_player_y());
}

/// Record the current position at the head of the trail
pub fn record_trail(state: &mut GameState) {
    let mut pos = state.player.pos;
    pos.y += state.tuning.trail_offset_y;
    state.trail.insert(0, TrailPoint { pos });
    state.trail.truncate(state.tuning.trail_length);
}

/// Scroll obstacles and trail left by the current world speed
pub fn scroll_world(state: &mut GameState) {
    let dx = state.tuning.movement_speed * state.speed_multiplier;
    let despawn_x = state.tuning.obstacle_despawn_x;

    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= dx;
    }
    state.obstacles.retain(|o| o.pos.x >= despawn_x);

    for point in &mut state.trail {
        point.pos.x -= dx;
    }
    state.trail.retain(|p| p.pos.x >= 0.0);
}
