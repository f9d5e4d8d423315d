//! Obstacle spawning and the wall-clock difficulty ramp

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Obstacle, ObstacleKind};
use crate::tuning::Tuning;

/// Step the speed ramp if a full interval has passed since the last step.
///
/// The reference point advances by exactly one interval so steps stay on
/// the session's 2500 ms grid regardless of frame jitter.
pub fn ramp_speed(state: &mut GameState, now_ms: f64) -> bool {
    let tuning = &state.tuning;
    if now_ms - state.last_speed_increase_ms < tuning.speed_ramp_interval_ms {
        return false;
    }
    state.last_speed_increase_ms += tuning.speed_ramp_interval_ms;
    state.speed_multiplier += tuning.speed_ramp_step;
    state.obstacle_spawn_interval = state
        .obstacle_spawn_interval
        .saturating_sub(tuning.spawn_interval_step)
        .max(tuning.min_spawn_interval);
    log::debug!(
        "Speed x{:.2}, spawn every {} frames",
        state.speed_multiplier,
        state.obstacle_spawn_interval
    );
    true
}

/// Pick a category (tree share vs snowman) then a variant uniformly within it
pub fn pick_sprite(tuning: &Tuning, rng: &mut impl Rng) -> (ObstacleKind, u8) {
    if rng.random_bool(tuning.tree_share) {
        (ObstacleKind::Tree, rng.random_range(0..tuning.tree_variants))
    } else {
        (
            ObstacleKind::Snowman,
            rng.random_range(0..tuning.snowman_variants),
        )
    }
}

/// New obstacle at the right edge with a random height inside the band
pub fn spawn_obstacle(tuning: &Tuning, rng: &mut impl Rng) -> Obstacle {
    let y = rng.random_range(tuning.min_player_y()..=tuning.max_player_y());
    let (kind, variant) = pick_sprite(tuning, rng);
    Obstacle {
        pos: Vec2::new(tuning.obstacle_spawn_x, y),
        kind,
        variant,
    }
}

/// Spawn on the current cadence
pub fn maybe_spawn(state: &mut GameState, rng: &mut impl Rng) {
    if state.frame_count % u64::from(state.obstacle_spawn_interval) == 0 {
        let obstacle = spawn_obstacle(&state.tuning, rng);
        state.obstacles.push(obstacle);
    }
}
