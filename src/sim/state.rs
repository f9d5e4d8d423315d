//! Game state and core simulation types
//!
//! One `GameState` per session. Sprites are referenced by category and
//! variant only; the pixel data lives in the host's `SpriteSet` so a
//! reset never throws away loaded images.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first ascend input or start interaction
    NotStarted,
    /// Active gameplay
    Running,
    /// Out of lives; score and time are frozen
    GameOver,
}

/// Obstacle sprite categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Snowman,
}

/// The skier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// x stays fixed; y is clamped to the playable band
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub vel_y: f32,
    /// Ascend input currently held
    pub ascending: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_x, tuning.canvas_height / 2.0),
            vel_y: 0.0,
            ascending: false,
        }
    }
}

/// A scrolling hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub kind: ObstacleKind,
    /// Variant index within `kind`
    pub variant: u8,
}

/// Ski trail sample (newest first)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
}

/// A puff of snow in the avalanche cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvalancheParticle {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// 0-1, removed at 0
    pub opacity: f32,
}

/// Avalanche sub-system state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avalanche {
    pub started: bool,
    /// Frames left before the avalanche breaks loose
    pub countdown: u32,
    /// 0..=max_intensity, drives the particle trickle and glow
    pub intensity: f32,
    /// Gap between the snow front and the skier
    pub distance: f32,
    pub particles: Vec<AvalancheParticle>,
}

impl Avalanche {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            started: false,
            countdown: tuning.avalanche_countdown,
            intensity: 0.0,
            distance: tuning.avalanche_start_distance,
            particles: Vec::new(),
        }
    }
}

/// Final numbers handed to the host when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub score: u64,
    /// Whole seconds, at least 1
    pub game_time: u64,
}

/// Complete state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub trail: Vec<TrailPoint>,
    pub avalanche: Avalanche,
    /// Running ticks since the session started
    pub frame_count: u64,
    /// Host clock (ms) at `NotStarted -> Running`
    pub session_start_ms: f64,
    pub speed_multiplier: f32,
    pub obstacle_spawn_interval: u32,
    pub last_speed_increase_ms: f64,
    pub score: u64,
    pub lives: u8,
    pub invulnerable: bool,
    pub invulnerability_timer: u32,
    /// Frozen when the session ends; 0 until then
    pub game_time: u64,
}

impl GameState {
    /// Create a fresh, not yet started session
    pub fn new(tuning: Tuning, now_ms: f64) -> Self {
        Self {
            phase: GamePhase::NotStarted,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            trail: Vec::with_capacity(tuning.trail_length + 1),
            avalanche: Avalanche::new(&tuning),
            frame_count: 0,
            session_start_ms: now_ms,
            speed_multiplier: 1.0,
            obstacle_spawn_interval: tuning.initial_spawn_interval,
            last_speed_increase_ms: now_ms,
            score: 0,
            lives: tuning.lives,
            invulnerable: false,
            invulnerability_timer: 0,
            game_time: 0,
            tuning,
        }
    }

    /// `NotStarted -> Running`. Ignored in any other phase.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::NotStarted {
            return false;
        }
        self.phase = GamePhase::Running;
        self.session_start_ms = now_ms;
        self.last_speed_increase_ms = now_ms;
        log::info!("Session started");
        true
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whole seconds since the session started (at least 1)
    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        let secs = ((now_ms - self.session_start_ms) / 1000.0).floor();
        (secs.max(0.0) as u64).max(1)
    }

    /// Seconds shown on the HUD clock
    pub fn clock_secs(&self, now_ms: f64) -> u64 {
        match self.phase {
            GamePhase::NotStarted => 0,
            GamePhase::Running => ((now_ms - self.session_start_ms).max(0.0) / 1000.0) as u64,
            GamePhase::GameOver => self.game_time,
        }
    }

    /// Score and time once the session has ended
    pub fn report(&self) -> Option<SessionReport> {
        self.is_game_over().then_some(SessionReport {
            score: self.score,
            game_time: self.game_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(Tuning::default(), 1000.0);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.game_time, 0);
        assert_eq!(state.player.pos, Vec2::new(150.0, 200.0));
        assert!(!state.avalanche.started);
        assert_eq!(state.avalanche.countdown, 300);
        assert!(state.report().is_none());
    }

    #[test]
    fn test_start_only_once() {
        let mut state = GameState::new(Tuning::default(), 0.0);
        assert!(state.start(500.0));
        assert_eq!(state.session_start_ms, 500.0);
        assert!(!state.start(900.0));
        assert_eq!(state.session_start_ms, 500.0);
    }

    #[test]
    fn test_elapsed_secs_has_floor_of_one() {
        let mut state = GameState::new(Tuning::default(), 0.0);
        state.start(0.0);
        assert_eq!(state.elapsed_secs(200.0), 1);
        assert_eq!(state.elapsed_secs(2999.0), 2);
    }
}
