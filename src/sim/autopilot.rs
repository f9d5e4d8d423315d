//! Demo-mode skier: steers around the nearest obstacle ahead
//!
//! Used by the headless harness and the in-browser attract/demo toggle.

use super::state::GameState;
use super::tick::TickInput;

/// How far ahead (world units) the pilot reacts to obstacles
const LOOKAHEAD: f32 = 220.0;
/// Preferred cruising height as a fraction of the playable band
const CRUISE: f32 = 0.5;

/// Decide the ascend latch for the next tick
pub fn steer(state: &GameState) -> TickInput {
    let tuning = &state.tuning;
    let player = &state.player;
    let top = tuning.min_player_y();
    let bottom = tuning.max_player_y();

    let threat = state
        .obstacles
        .iter()
        .filter(|o| {
            let ahead = o.pos.x - player.pos.x;
            ahead > -tuning.obstacle_width && ahead < LOOKAHEAD
        })
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let target_y = match threat {
        Some(obstacle) => {
            let clearance = (tuning.player_height + tuning.obstacle_height) / 2.0 + 10.0;
            let above = obstacle.pos.y - clearance;
            let below = obstacle.pos.y + clearance;
            // Dodge to whichever side is reachable and closer
            let go_above = if above < top {
                false
            } else if below > bottom {
                true
            } else {
                (player.pos.y - above).abs() <= (player.pos.y - below).abs()
            };
            if go_above { above } else { below }
        }
        None => top + (bottom - top) * CRUISE,
    };

    // Ascend when below target, leaving room to brake against gravity
    let braking = player.vel_y.min(0.0).abs() * player.vel_y.abs() / (2.0 * tuning.gravity);
    TickInput {
        ascending: player.pos.y - braking > target_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, Obstacle, ObstacleKind};
    use crate::sim::tick;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_climbs_over_low_obstacle() {
        let mut state = GameState::new(Tuning::default(), 0.0);
        state.player.pos.y = 300.0;
        state.obstacles.push(Obstacle {
            pos: Vec2::new(300.0, 310.0),
            kind: ObstacleKind::Tree,
            variant: 0,
        });
        assert!(steer(&state).ascending);
    }

    #[test]
    fn test_drops_under_high_obstacle() {
        let mut state = GameState::new(Tuning::default(), 0.0);
        state.player.pos.y = 70.0;
        state.obstacles.push(Obstacle {
            pos: Vec2::new(300.0, 60.0),
            kind: ObstacleKind::Snowman,
            variant: 0,
        });
        assert!(!steer(&state).ascending);
    }

    #[test]
    fn test_cruises_mid_band_when_clear() {
        let mut state = GameState::new(Tuning::default(), 0.0);
        state.player.pos.y = 320.0;
        assert!(steer(&state).ascending);
        state.player.pos.y = 60.0;
        assert!(!steer(&state).ascending);
    }

    #[test]
    fn test_piloted_run_stays_in_band() {
        let mut state = GameState::new(Tuning::default(), 0.0);
        state.start(0.0);
        let mut rng = Pcg32::seed_from_u64(2024);
        for n in 1..=3000u64 {
            let input = steer(&state);
            tick::tick(&mut state, &input, &mut rng, n as f64 * 1000.0 / 60.0);
            let y = state.player.pos.y;
            assert!(y >= state.tuning.min_player_y() && y <= state.tuning.max_player_y());
            if state.phase != GamePhase::Running {
                break;
            }
        }
    }
}
