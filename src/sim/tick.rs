//! Per-frame simulation step
//!
//! One call advances a running session by exactly one frame. The host
//! supplies the latched input, the session rng and its clock reading.

use rand::Rng;

use super::state::{GamePhase, GameState};
use super::{avalanche, collision, physics, spawn};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Ascend held (keyboard, pointer or touch)
    pub ascending: bool,
}

/// What happened during a tick, for the host's logging and effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub life_lost: bool,
    pub scored: bool,
    pub game_over: bool,
    pub avalanche_started: bool,
}

/// Advance the session by one frame. No-op unless the session is running.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    rng: &mut impl Rng,
    now_ms: f64,
) -> TickEvents {
    let mut events = TickEvents::default();
    if state.phase != GamePhase::Running {
        return events;
    }

    if state.invulnerable {
        state.invulnerability_timer = state.invulnerability_timer.saturating_sub(1);
        if state.invulnerability_timer == 0 {
            state.invulnerable = false;
        }
    }

    spawn::ramp_speed(state, now_ms);

    state.player.ascending = input.ascending;
    physics::update_player(&mut state.player, &state.tuning);
    physics::record_trail(state);
    physics::scroll_world(state);

    spawn::maybe_spawn(state, rng);

    let was_started = state.avalanche.started;
    avalanche::advance(
        &mut state.avalanche,
        &state.player,
        state.frame_count,
        &state.tuning,
        rng,
    );
    events.avalanche_started = !was_started && state.avalanche.started;

    let caught = avalanche::is_lethal(&state.avalanche, &state.tuning);
    let hit = !state.invulnerable
        && collision::first_hit(&state.player, &state.obstacles, &state.tuning).is_some();

    if caught || hit {
        events.life_lost = true;
        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            state.phase = GamePhase::GameOver;
            state.game_time = state.elapsed_secs(now_ms);
            events.game_over = true;
            log::info!(
                "Game over: score {} in {}s",
                state.score,
                state.game_time
            );
        } else {
            state.invulnerable = true;
            state.invulnerability_timer = state.tuning.invulnerability_frames;
            log::info!(
                "Life lost ({}), {} remaining",
                if caught { "avalanche" } else { "obstacle" },
                state.lives
            );
        }
    } else if state.frame_count % state.tuning.score_interval_frames == 0 {
        state.score += state.tuning.score_step;
        events.scored = true;
    }

    state.frame_count += 1;
    events
}
