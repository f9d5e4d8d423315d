//! Backend-independent frame description
//!
//! `build_scene` turns a `GameState` into an ordered list of draw commands
//! plus the HUD strings. Layers are emitted in a fixed order: background,
//! avalanche, trail, obstacles, player, overlay. Any sprite that failed to
//! load is replaced by a flat-colour shape here, so the GPU side never has
//! to know about fallbacks.

use glam::Vec2;

use super::vertex::colors;
use crate::assets::{SpriteId, SpriteSet};
use crate::format_clock;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, ObstacleKind, avalanche};

/// Draw order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Avalanche,
    Trail,
    Obstacles,
    Player,
    Overlay,
}

/// How a shape is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Color([f32; 4]),
    Sprite {
        id: SpriteId,
        /// Multiplied with the texel (alpha for translucency)
        tint: [f32; 4],
        desaturate: bool,
    },
}

impl Fill {
    pub fn sprite(&self) -> Option<SpriteId> {
        match self {
            Fill::Sprite { id, .. } => Some(*id),
            Fill::Color(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned quad rotated about its center (radians)
    Quad {
        center: Vec2,
        size: Vec2,
        rotation: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
    },
    /// Strip through the points, newest first; alpha fades toward the tail
    Trail {
        points: Vec<Vec2>,
        width: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd {
    pub layer: Layer,
    pub shape: Shape,
    pub fill: Fill,
}

/// Text for the DOM HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub score: String,
    /// `None` when the timer is hidden in settings
    pub clock: Option<String>,
    /// Drives the start prompt and game-over panel
    pub phase: GamePhase,
}

impl HudText {
    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCmd>,
    pub hud: HudText,
}

/// Life icon size and spacing (logical pixels)
const LIFE_ICON: f32 = 24.0;
const LIFE_SPACING: f32 = 30.0;
/// Width of the red band at the avalanche front
const GLOW_WIDTH: f32 = 40.0;
const TRAIL_WIDTH: f32 = 3.0;

pub fn build_scene(
    state: &GameState,
    sprites: &SpriteSet,
    settings: &Settings,
    now_ms: f64,
) -> Scene {
    let tuning = &state.tuning;
    let canvas = Vec2::new(tuning.canvas_width, tuning.canvas_height);
    let mut commands = Vec::new();
    let mut push = |layer, shape, fill| commands.push(DrawCmd { layer, shape, fill });

    // Background
    let full = Shape::Quad {
        center: canvas / 2.0,
        size: canvas,
        rotation: 0.0,
    };
    if sprites.has(SpriteId::Background) {
        push(Layer::Background, full, plain_sprite(SpriteId::Background));
    } else {
        push(Layer::Background, full, Fill::Color(colors::SKY));
        let slope_top = tuning.band_top;
        push(
            Layer::Background,
            Shape::Quad {
                center: Vec2::new(canvas.x / 2.0, (slope_top + canvas.y) / 2.0),
                size: Vec2::new(canvas.x, canvas.y - slope_top),
                rotation: 0.0,
            },
            Fill::Color(colors::SNOW),
        );
    }

    // Avalanche
    let snow = &state.avalanche;
    if snow.started {
        let front = avalanche::front_x(snow, &state.player, tuning);
        if front > 0.0 {
            push(
                Layer::Avalanche,
                Shape::Quad {
                    center: Vec2::new(front / 2.0, canvas.y / 2.0),
                    size: Vec2::new(front, canvas.y),
                    rotation: 0.0,
                },
                Fill::Color(colors::AVALANCHE_WALL),
            );
        }
        if settings.avalanche_glow {
            let pulse = if settings.effective_glow_pulse() {
                0.85 + 0.15 * (state.frame_count as f32 * 0.1).sin()
            } else {
                1.0
            };
            let mut glow = colors::AVALANCHE_GLOW;
            glow[3] = (0.15 + 0.35 * snow.intensity) * pulse;
            push(
                Layer::Avalanche,
                Shape::Quad {
                    center: Vec2::new(front + GLOW_WIDTH / 2.0, canvas.y / 2.0),
                    size: Vec2::new(GLOW_WIDTH, canvas.y),
                    rotation: 0.0,
                },
                Fill::Color(glow),
            );
        }
        for particle in snow.particles.iter().take(settings.max_particles()) {
            let mut color = colors::WHITE;
            color[3] = particle.opacity.clamp(0.0, 1.0);
            push(
                Layer::Avalanche,
                Shape::Circle {
                    center: particle.pos,
                    radius: particle.size / 2.0,
                },
                Fill::Color(color),
            );
        }
    }

    // Ski trail
    if settings.trails && state.trail.len() >= 2 {
        push(
            Layer::Trail,
            Shape::Trail {
                points: state.trail.iter().map(|p| p.pos).collect(),
                width: TRAIL_WIDTH,
            },
            Fill::Color(colors::TRAIL),
        );
    }

    // Obstacles
    let obstacle_size = Vec2::new(tuning.obstacle_width, tuning.obstacle_height);
    for obstacle in &state.obstacles {
        let id = SpriteId::obstacle(obstacle.kind, obstacle.variant);
        let fill = if sprites.has(id) {
            plain_sprite(id)
        } else {
            Fill::Color(match obstacle.kind {
                ObstacleKind::Tree => colors::TREE,
                ObstacleKind::Snowman => colors::SNOWMAN,
            })
        };
        push(
            Layer::Obstacles,
            Shape::Quad {
                center: obstacle.pos,
                size: obstacle_size,
                rotation: 0.0,
            },
            fill,
        );
    }

    // Player (no sprite, no player)
    if sprites.has(SpriteId::Player) {
        let blink_off = state.invulnerable
            && settings.effective_blink()
            && (state.invulnerability_timer / 6) % 2 == 1;
        let alpha = if blink_off { 0.35 } else { 1.0 };
        // Falls over sideways once the run is over
        let rotation = if state.is_game_over() {
            std::f32::consts::FRAC_PI_2
        } else {
            0.0
        };
        push(
            Layer::Player,
            Shape::Quad {
                center: state.player.pos,
                size: Vec2::new(tuning.player_width, tuning.player_height),
                rotation,
            },
            Fill::Sprite {
                id: SpriteId::Player,
                tint: [1.0, 1.0, 1.0, alpha],
                desaturate: false,
            },
        );
    }

    // Life icons, right-aligned; lost lives greyed out
    let has_heart = sprites.has(SpriteId::Heart);
    for i in 0..tuning.lives {
        let lost = i >= state.lives;
        let x = canvas.x - LIFE_SPACING * (tuning.lives - i) as f32;
        let alpha = if lost { 0.3 } else { 1.0 };
        let fill = if has_heart {
            Fill::Sprite {
                id: SpriteId::Heart,
                tint: [1.0, 1.0, 1.0, alpha],
                desaturate: lost,
            }
        } else {
            let [r, g, b, _] = if lost { [0.5, 0.5, 0.5, 1.0] } else { colors::HEART };
            Fill::Color([r, g, b, alpha])
        };
        push(
            Layer::Overlay,
            Shape::Quad {
                center: Vec2::new(x + LIFE_ICON / 2.0, LIFE_SPACING / 2.0 + 4.0),
                size: Vec2::splat(LIFE_ICON),
                rotation: 0.0,
            },
            fill,
        );
    }

    let hud = HudText {
        score: format!("Score: {}", state.score),
        clock: settings
            .show_timer
            .then(|| format_clock(state.clock_secs(now_ms))),
        phase: state.phase,
    };

    Scene { commands, hud }
}

fn plain_sprite(id: SpriteId) -> Fill {
    Fill::Sprite {
        id,
        tint: colors::WHITE,
        desaturate: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{SpriteImage, SpriteManifest};
    use crate::sim::{Obstacle, TickInput, tick};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn all_sprites() -> SpriteSet {
        let manifest = SpriteManifest::standard("https://cdn.example", "/assets", 3, 2);
        SpriteSet::acquire(&manifest, |url| {
            SpriteImage::new(url, 1, 1, vec![255; 4])
        })
    }

    /// A running state with every layer populated
    fn busy_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), 0.0);
        state.start(0.0);
        let mut rng = Pcg32::seed_from_u64(77);
        for n in 1..=320u64 {
            tick(&mut state, &TickInput::default(), &mut rng, n as f64 * 1000.0 / 60.0);
            // Keep the skier alive, but leave one obstacle far away on screen
            state.obstacles.retain(|o| o.pos.x > 400.0);
        }
        state.obstacles.push(Obstacle {
            pos: Vec2::new(500.0, 120.0),
            kind: ObstacleKind::Snowman,
            variant: 1,
        });
        state
    }

    #[test]
    fn test_layers_are_in_draw_order() {
        let state = busy_state();
        let scene = build_scene(&state, &all_sprites(), &Settings::default(), 5000.0);
        let layers: Vec<Layer> = scene.commands.iter().map(|c| c.layer).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
        for layer in [
            Layer::Background,
            Layer::Avalanche,
            Layer::Trail,
            Layer::Obstacles,
            Layer::Player,
            Layer::Overlay,
        ] {
            assert!(layers.contains(&layer), "missing {layer:?}");
        }
    }

    #[test]
    fn test_fallbacks_without_sprites() {
        let state = busy_state();
        let scene = build_scene(&state, &SpriteSet::empty(), &Settings::default(), 5000.0);

        assert!(scene.commands.iter().all(|c| c.fill.sprite().is_none()));
        assert!(!scene.commands.iter().any(|c| c.layer == Layer::Player));
        assert_eq!(scene.commands[0].fill, Fill::Color(colors::SKY));
        let snowman = scene
            .commands
            .iter()
            .find(|c| c.layer == Layer::Obstacles && c.fill == Fill::Color(colors::SNOWMAN));
        assert!(snowman.is_some());
        let hearts = scene
            .commands
            .iter()
            .filter(|c| c.layer == Layer::Overlay)
            .count();
        assert_eq!(hearts, 3);
    }

    #[test]
    fn test_lost_lives_are_desaturated() {
        let mut state = busy_state();
        state.lives = 1;
        let scene = build_scene(&state, &all_sprites(), &Settings::default(), 0.0);
        let icons: Vec<&Fill> = scene
            .commands
            .iter()
            .filter(|c| c.layer == Layer::Overlay)
            .map(|c| &c.fill)
            .collect();
        assert_eq!(icons.len(), 3);
        let greyed = icons
            .iter()
            .filter(|f| matches!(f, Fill::Sprite { desaturate: true, tint, .. } if tint[3] < 1.0))
            .count();
        assert_eq!(greyed, 2);
    }

    #[test]
    fn test_player_falls_over_on_game_over() {
        let mut state = busy_state();
        state.phase = GamePhase::GameOver;
        state.game_time = 65;
        let scene = build_scene(&state, &all_sprites(), &Settings::default(), 99_000.0);
        let player = scene
            .commands
            .iter()
            .find(|c| c.layer == Layer::Player)
            .unwrap();
        match player.shape {
            Shape::Quad { rotation, .. } => assert!(rotation > 1.0),
            _ => panic!("player should be a quad"),
        }
        assert_eq!(scene.hud.clock.as_deref(), Some("01:05"));
        assert!(scene.hud.game_over());
    }

    #[test]
    fn test_hud_changes_when_run_starts_at_zero() {
        let mut state = GameState::new(Tuning::default(), 0.0);
        let sprites = SpriteSet::empty();
        let settings = Settings::default();
        let idle = build_scene(&state, &sprites, &settings, 0.0).hud;

        // Started but nothing scored yet and the clock still reads 00:00
        state.start(0.0);
        let running = build_scene(&state, &sprites, &settings, 0.0).hud;

        assert_eq!(idle.score, running.score);
        assert_eq!(idle.clock, running.clock);
        assert_ne!(idle, running);
        assert_eq!(running.phase, GamePhase::Running);
        assert!(!running.game_over());
    }

    #[test]
    fn test_settings_trim_optional_layers() {
        let state = busy_state();
        let settings = Settings {
            trails: false,
            particles: false,
            avalanche_glow: false,
            show_timer: false,
            ..Default::default()
        };
        let scene = build_scene(&state, &all_sprites(), &settings, 5000.0);
        assert!(!scene.commands.iter().any(|c| c.layer == Layer::Trail));
        assert!(
            !scene
                .commands
                .iter()
                .any(|c| matches!(c.shape, Shape::Circle { .. }))
        );
        assert!(scene.hud.clock.is_none());
        assert_eq!(scene.hud.score, format!("Score: {}", state.score));
    }
}
