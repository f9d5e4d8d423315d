//! Axis-aligned box overlap between the skier and obstacles

use glam::Vec2;

use super::state::{Obstacle, Player};
use crate::tuning::Tuning;

/// Axis-aligned bounding box stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            half: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        d.x < self.half.x + other.half.x && d.y < self.half.y + other.half.y
    }
}

pub fn player_box(player: &Player, tuning: &Tuning) -> Aabb {
    Aabb::from_center(player.pos, tuning.player_width, tuning.player_height)
}

pub fn obstacle_box(obstacle: &Obstacle, tuning: &Tuning) -> Aabb {
    Aabb::from_center(obstacle.pos, tuning.obstacle_width, tuning.obstacle_height)
}

/// Index of the first obstacle touching the player, if any
pub fn first_hit(player: &Player, obstacles: &[Obstacle], tuning: &Tuning) -> Option<usize> {
    let player = player_box(player, tuning);
    obstacles
        .iter()
        .position(|o| player.overlaps(&obstacle_box(o, tuning)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;

    fn obstacle_at(x: f32, y: f32) -> Obstacle {
        Obstacle {
            pos: Vec2::new(x, y),
            kind: ObstacleKind::Tree,
            variant: 0,
        }
    }

    #[test]
    fn test_overlap_and_touching_edges() {
        let a = Aabb::from_center(Vec2::ZERO, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::from_center(Vec2::new(9.0, 0.0), 10.0, 10.0)));
        // Edges exactly touching
        assert!(!a.overlaps(&Aabb::from_center(Vec2::new(10.0, 0.0), 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::from_center(Vec2::new(0.0, 12.0), 10.0, 10.0)));
    }

    #[test]
    fn test_first_hit_picks_first_match() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        let obstacles = vec![
            obstacle_at(600.0, player.pos.y),
            obstacle_at(player.pos.x + 10.0, player.pos.y + 5.0),
            obstacle_at(player.pos.x, player.pos.y),
        ];
        assert_eq!(first_hit(&player, &obstacles, &tuning), Some(1));
    }

    #[test]
    fn test_clear_of_obstacles() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        // Player box 30x40, obstacle box 40x50: needs > 35 horizontal clearance
        let obstacles = vec![obstacle_at(player.pos.x + 36.0, player.pos.y)];
        assert_eq!(first_hit(&player, &obstacles, &tuning), None);
    }
}
