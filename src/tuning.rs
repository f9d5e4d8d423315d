//! Data-driven game balance
//!
//! Every number the simulation depends on lives here so a host can load
//! overrides from JSON without recompiling. `Tuning::default()` is the
//! shipped balance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, START_LIVES};

/// Rejected tuning files
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Top of the playable band
    pub band_top: f32,
    /// Distance from the canvas bottom to the bottom of the playable band
    pub band_bottom_margin: f32,

    // === Player ===
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Base scroll speed and also the vertical velocity limit
    pub movement_speed: f32,
    /// Applied per tick while ascending (negative = up)
    pub ascend_accel: f32,
    /// Applied per tick while not ascending
    pub gravity: f32,
    pub trail_length: usize,
    pub trail_offset_y: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Spawned this far right of the canvas origin
    pub obstacle_spawn_x: f32,
    /// Obstacles left of this are dropped
    pub obstacle_despawn_x: f32,
    pub initial_spawn_interval: u32,
    pub min_spawn_interval: u32,
    pub spawn_interval_step: u32,
    /// Probability an obstacle is a tree (otherwise a snowman)
    pub tree_share: f64,
    pub tree_variants: u8,
    pub snowman_variants: u8,

    // === Difficulty ramp ===
    pub speed_ramp_interval_ms: f64,
    pub speed_ramp_step: f32,

    // === Lives & scoring ===
    pub lives: u8,
    pub invulnerability_frames: u32,
    pub score_interval_frames: u64,
    pub score_step: u64,

    // === Avalanche ===
    pub avalanche_countdown: u32,
    pub avalanche_start_distance: f32,
    pub avalanche_min_distance: f32,
    pub avalanche_lethal_distance: f32,
    pub avalanche_approach_frames: u64,
    pub avalanche_seed_particles: usize,
    pub avalanche_intensity_step: f32,
    pub avalanche_intensity_frames: u64,
    pub avalanche_max_intensity: f32,
    pub avalanche_trickle_frames: u64,
    pub avalanche_trickle_scale: f32,
    pub particle_fade: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            band_top: 50.0,
            band_bottom_margin: 70.0,

            player_x: 150.0,
            player_width: 30.0,
            player_height: 40.0,
            movement_speed: 5.0,
            ascend_accel: -0.2,
            gravity: 0.15,
            trail_length: 50,
            trail_offset_y: 10.0,

            obstacle_width: 40.0,
            obstacle_height: 50.0,
            obstacle_spawn_x: CANVAS_WIDTH + 50.0,
            obstacle_despawn_x: -50.0,
            initial_spawn_interval: 90,
            min_spawn_interval: 30,
            spawn_interval_step: 5,
            tree_share: 0.7,
            tree_variants: 3,
            snowman_variants: 2,

            speed_ramp_interval_ms: 2500.0,
            speed_ramp_step: 0.05,

            lives: START_LIVES,
            invulnerability_frames: 120,
            score_interval_frames: 60,
            score_step: 10,

            avalanche_countdown: 300,
            avalanche_start_distance: 300.0,
            avalanche_min_distance: 40.0,
            avalanche_lethal_distance: 50.0,
            avalanche_approach_frames: 30,
            avalanche_seed_particles: 50,
            avalanche_intensity_step: 0.05,
            avalanche_intensity_frames: 60,
            avalanche_max_intensity: 1.0,
            avalanche_trickle_frames: 5,
            avalanche_trickle_scale: 5.0,
            particle_fade: 0.005,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Upper edge of the playable band
    pub fn min_player_y(&self) -> f32 {
        self.band_top
    }

    /// Lower edge of the playable band
    pub fn max_player_y(&self) -> f32 {
        self.canvas_height - self.band_bottom_margin
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        if self.max_player_y() <= self.min_player_y() {
            return invalid("band_bottom_margin", "playable band is empty");
        }
        if self.movement_speed <= 0.0 {
            return invalid("movement_speed", "must be positive");
        }
        if self.min_spawn_interval == 0 {
            return invalid("min_spawn_interval", "must be at least one frame");
        }
        if self.initial_spawn_interval < self.min_spawn_interval {
            return invalid("initial_spawn_interval", "below min_spawn_interval");
        }
        if !(0.0..=1.0).contains(&self.tree_share) {
            return invalid("tree_share", "must be within 0..=1");
        }
        if self.tree_variants == 0 || self.snowman_variants == 0 {
            return invalid("tree_variants", "each category needs a variant");
        }
        if self.speed_ramp_interval_ms <= 0.0 {
            return invalid("speed_ramp_interval_ms", "must be positive");
        }
        if self.lives == 0 {
            return invalid("lives", "a session needs at least one life");
        }
        if self.speed_ramp_step < 0.0 {
            return invalid("speed_ramp_step", "must not be negative");
        }
        if self.score_interval_frames == 0 {
            return invalid("score_interval_frames", "must be at least one frame");
        }
        if self.avalanche_approach_frames == 0 {
            return invalid("avalanche_approach_frames", "must be at least one frame");
        }
        if self.avalanche_intensity_frames == 0 {
            return invalid("avalanche_intensity_frames", "must be at least one frame");
        }
        if self.avalanche_trickle_frames == 0 {
            return invalid("avalanche_trickle_frames", "must be at least one frame");
        }
        if self.avalanche_intensity_step < 0.0 {
            return invalid("avalanche_intensity_step", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.avalanche_max_intensity) {
            return invalid("avalanche_max_intensity", "must be within 0..=1");
        }
        if self.particle_fade <= 0.0 {
            return invalid("particle_fade", "must be positive");
        }
        if self.avalanche_min_distance < 0.0 {
            return invalid("avalanche_min_distance", "must not be negative");
        }
        if self.avalanche_min_distance > self.avalanche_start_distance {
            return invalid("avalanche_min_distance", "above avalanche_start_distance");
        }
        if self.trail_length == 0 {
            return invalid("trail_length", "must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.min_player_y(), 50.0);
        assert_eq!(tuning.max_player_y(), 330.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "lives": 5, "gravity": 0.3 }"#).unwrap();
        assert_eq!(tuning.lives, 5);
        assert!((tuning.gravity - 0.3).abs() < f32::EPSILON);
        assert_eq!(tuning.avalanche_countdown, 300);
    }

    #[test]
    fn test_rejects_zero_lives() {
        let err = Tuning::from_json(r#"{ "lives": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "lives", .. }));
    }

    fn rejected_field(json: &str) -> &'static str {
        match Tuning::from_json(json) {
            Err(TuningError::Invalid { field, .. }) => field,
            other => panic!("{json} should be rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_positive_particle_fade() {
        assert_eq!(rejected_field(r#"{ "particle_fade": 0.0 }"#), "particle_fade");
        assert_eq!(rejected_field(r#"{ "particle_fade": -0.01 }"#), "particle_fade");
    }

    #[test]
    fn test_rejects_negative_speed_ramp_step() {
        assert_eq!(rejected_field(r#"{ "speed_ramp_step": -0.05 }"#), "speed_ramp_step");
    }

    #[test]
    fn test_rejects_negative_intensity_step() {
        assert_eq!(
            rejected_field(r#"{ "avalanche_intensity_step": -0.05 }"#),
            "avalanche_intensity_step"
        );
    }

    #[test]
    fn test_rejects_intensity_cap_outside_unit_range() {
        assert_eq!(
            rejected_field(r#"{ "avalanche_max_intensity": 3.0 }"#),
            "avalanche_max_intensity"
        );
        assert_eq!(
            rejected_field(r#"{ "avalanche_max_intensity": -0.5 }"#),
            "avalanche_max_intensity"
        );
    }

    #[test]
    fn test_rejects_negative_min_distance() {
        assert_eq!(
            rejected_field(r#"{ "avalanche_min_distance": -1.0 }"#),
            "avalanche_min_distance"
        );
    }

    #[test]
    fn test_rejects_zero_cadence_by_name() {
        for field in [
            "score_interval_frames",
            "avalanche_approach_frames",
            "avalanche_intensity_frames",
            "avalanche_trickle_frames",
        ] {
            let json = format!(r#"{{ "{field}": 0 }}"#);
            assert_eq!(rejected_field(&json), field);
        }
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ lives: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
