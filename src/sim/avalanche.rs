//! The avalanche: a countdown, then an ever-closer wall of snow
//!
//! Distance to the skier only ever shrinks and intensity only ever grows,
//! which bounds the length of a run even if every obstacle is dodged.

use glam::Vec2;
use rand::Rng;

use super::state::{Avalanche, AvalancheParticle, Player};
use crate::tuning::Tuning;

/// Horizontal spread of freshly spawned particles behind the skier
const SPAWN_DEPTH: f32 = 60.0;
/// Max random vertical drift per tick
const JITTER: f32 = 1.0;

/// Advance the avalanche by one frame
pub fn advance(
    avalanche: &mut Avalanche,
    player: &Player,
    frame: u64,
    tuning: &Tuning,
    rng: &mut impl Rng,
) {
    if !avalanche.started {
        if avalanche.countdown > 0 {
            avalanche.countdown -= 1;
        } else {
            avalanche.started = true;
            for _ in 0..tuning.avalanche_seed_particles {
                let particle = spawn_particle(avalanche, player, tuning, rng);
                avalanche.particles.push(particle);
            }
            log::info!("Avalanche started");
        }
        return;
    }

    if frame % tuning.avalanche_intensity_frames == 0 {
        avalanche.intensity = (avalanche.intensity + tuning.avalanche_intensity_step)
            .min(tuning.avalanche_max_intensity);
    }
    if frame % tuning.avalanche_approach_frames == 0 {
        avalanche.distance = (avalanche.distance - 1.0).max(tuning.avalanche_min_distance);
    }

    for particle in &mut avalanche.particles {
        particle.pos.x += particle.speed;
        particle.pos.y += rng.random_range(-JITTER..=JITTER);
        particle.opacity -= tuning.particle_fade;
    }
    avalanche.particles.retain(|p| p.opacity > 0.0);

    if frame % tuning.avalanche_trickle_frames == 0 {
        let count = (tuning.avalanche_trickle_scale * avalanche.intensity).floor() as usize;
        for _ in 0..count {
            let particle = spawn_particle(avalanche, player, tuning, rng);
            avalanche.particles.push(particle);
        }
    }
}

/// Screen x of the snow front (the skier sits `distance` ahead of it)
pub fn front_x(avalanche: &Avalanche, player: &Player, tuning: &Tuning) -> f32 {
    // Map the distance range onto the strip left of the skier
    let range = (tuning.avalanche_start_distance - tuning.avalanche_min_distance).max(1.0);
    let closeness = 1.0 - (avalanche.distance - tuning.avalanche_min_distance) / range;
    let min_gap = tuning.player_width;
    let max_gap = player.pos.x + min_gap;
    player.pos.x - (max_gap - (max_gap - min_gap) * closeness.clamp(0.0, 1.0))
}

/// The avalanche caught up with the skier
pub fn is_lethal(avalanche: &Avalanche, tuning: &Tuning) -> bool {
    avalanche.started && avalanche.distance <= tuning.avalanche_lethal_distance
}

fn spawn_particle(
    avalanche: &Avalanche,
    player: &Player,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> AvalancheParticle {
    let front = front_x(avalanche, player, tuning);
    AvalancheParticle {
        pos: Vec2::new(
            front - rng.random_range(0.0..SPAWN_DEPTH),
            rng.random_range(0.0..tuning.canvas_height),
        ),
        size: rng.random_range(10.0..30.0),
        speed: rng.random_range(1.0..3.0) + avalanche.intensity,
        opacity: rng.random_range(0.5..1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run(avalanche: &mut Avalanche, frames: std::ops::Range<u64>, rng: &mut Pcg32) {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        for frame in frames {
            advance(avalanche, &player, frame, &tuning, rng);
        }
    }

    #[test]
    fn test_countdown_then_seed_batch() {
        let tuning = Tuning::default();
        let mut avalanche = Avalanche::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(3);

        run(&mut avalanche, 0..300, &mut rng);
        assert!(!avalanche.started);
        assert_eq!(avalanche.countdown, 0);
        assert!(avalanche.particles.is_empty());

        run(&mut avalanche, 300..301, &mut rng);
        assert!(avalanche.started);
        assert_eq!(avalanche.particles.len(), 50);
        assert_eq!(avalanche.distance, 300.0);
        assert_eq!(avalanche.intensity, 0.0);
    }

    #[test]
    fn test_distance_and_intensity_ramps_are_monotonic_and_bounded() {
        let tuning = Tuning::default();
        let mut avalanche = Avalanche::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(9);
        let player = Player::new(&tuning);

        let mut last_distance = avalanche.distance;
        let mut last_intensity = avalanche.intensity;
        for frame in 0..12_000 {
            advance(&mut avalanche, &player, frame, &tuning, &mut rng);
            assert!(avalanche.distance <= last_distance);
            assert!(avalanche.distance >= 40.0);
            assert!(avalanche.intensity >= last_intensity);
            assert!(avalanche.intensity <= 1.0);
            last_distance = avalanche.distance;
            last_intensity = avalanche.intensity;
        }
        assert_eq!(avalanche.distance, 40.0);
        assert!((avalanche.intensity - 1.0).abs() < 1e-6);
        assert!(is_lethal(&avalanche, &tuning));
    }

    #[test]
    fn test_particles_fade_out() {
        let tuning = Tuning::default();
        let mut avalanche = Avalanche::new(&tuning);
        avalanche.started = true;
        avalanche.particles.push(AvalancheParticle {
            pos: Vec2::new(0.0, 100.0),
            size: 10.0,
            speed: 2.0,
            opacity: 0.008,
        });
        let mut rng = Pcg32::seed_from_u64(5);

        // Frames not on any cadence
        run(&mut avalanche, 1..2, &mut rng);
        assert_eq!(avalanche.particles.len(), 1);
        assert_eq!(avalanche.particles[0].pos.x, 2.0);
        run(&mut avalanche, 2..3, &mut rng);
        assert!(avalanche.particles.is_empty());
    }

    #[test]
    fn test_trickle_scales_with_intensity() {
        let tuning = Tuning::default();
        let mut avalanche = Avalanche::new(&tuning);
        avalanche.started = true;
        avalanche.intensity = 0.6;
        let mut rng = Pcg32::seed_from_u64(11);

        // Frame 5: trickle only (not on the 30/60 cadences)
        run(&mut avalanche, 5..6, &mut rng);
        assert_eq!(avalanche.particles.len(), 3);
    }

    #[test]
    fn test_front_moves_toward_player() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        let mut avalanche = Avalanche::new(&tuning);
        let far = front_x(&avalanche, &player, &tuning);
        avalanche.distance = tuning.avalanche_min_distance;
        let near = front_x(&avalanche, &player, &tuning);
        assert!(near > far);
        assert!(near < player.pos.x);
        assert_eq!(far, -tuning.player_width);
    }
}
