//! Scene tessellation and texture batching
//!
//! Turns a `Scene` into one vertex list in NDC plus a run of batches, one
//! per consecutive group of commands sharing a texture. Draw order is
//! preserved; batches are never reordered to save binds.

use std::ops::Range;

use glam::Vec2;

use super::scene::{Fill, Scene, Shape};
use super::shapes;
use super::vertex::Vertex;
use crate::assets::SpriteId;

/// Maps logical canvas pixels onto the surface, letterboxing to keep
/// the aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Surface size in physical pixels
    pub surface: Vec2,
    /// Logical canvas size
    pub world: Vec2,
}

impl Viewport {
    pub fn new(surface_width: u32, surface_height: u32, world: Vec2) -> Self {
        Self {
            surface: Vec2::new(surface_width.max(1) as f32, surface_height.max(1) as f32),
            world,
        }
    }

    /// Fraction of each NDC axis covered by the canvas
    fn extent(&self) -> Vec2 {
        let surface_aspect = self.surface.x / self.surface.y;
        let world_aspect = self.world.x / self.world.y;
        if surface_aspect > world_aspect {
            // Bars left and right
            Vec2::new(world_aspect / surface_aspect, 1.0)
        } else {
            Vec2::new(1.0, surface_aspect / world_aspect)
        }
    }

    /// Canvas coordinates (y down) to NDC (y up)
    pub fn to_ndc(&self, p: Vec2) -> [f32; 2] {
        let extent = self.extent();
        let unit = p / self.world * 2.0 - Vec2::ONE;
        [unit.x * extent.x, -unit.y * extent.y]
    }
}

/// Vertices drawn with one texture binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// `None` binds the white texel
    pub texture: Option<SpriteId>,
    pub vertices: Range<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameGeometry {
    pub vertices: Vec<Vertex>,
    pub batches: Vec<Batch>,
}

impl FrameGeometry {
    fn push(&mut self, texture: Option<SpriteId>, verts: &[Vertex]) {
        if verts.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(verts);
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.vertices.end = end,
            _ => self.batches.push(Batch {
                texture,
                vertices: start..end,
            }),
        }
    }
}

/// Tessellate every command in order and convert to NDC
pub fn tessellate(scene: &Scene, viewport: &Viewport, circle_segments: u32) -> FrameGeometry {
    let mut geometry = FrameGeometry::default();

    for cmd in &scene.commands {
        let (color, desaturate) = match cmd.fill {
            Fill::Color(color) => (color, 0.0),
            Fill::Sprite {
                tint, desaturate, ..
            } => (tint, if desaturate { 1.0 } else { 0.0 }),
        };

        let mut verts = match &cmd.shape {
            Shape::Quad {
                center,
                size,
                rotation,
            } => shapes::quad(*center, *size, *rotation, color, desaturate).to_vec(),
            Shape::Circle { center, radius } => {
                shapes::circle(*center, *radius, color, circle_segments)
            }
            Shape::Trail { points, width } => shapes::trail(points, *width, color),
        };

        for v in &mut verts {
            v.position = viewport.to_ndc(Vec2::from(v.position));
        }
        geometry.push(cmd.fill.sprite(), &verts);
    }

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::scene::{DrawCmd, HudText, Layer};
    use crate::sim::GamePhase;

    fn world() -> Vec2 {
        Vec2::new(800.0, 400.0)
    }

    fn cmd(layer: Layer, fill: Fill) -> DrawCmd {
        DrawCmd {
            layer,
            shape: Shape::Quad {
                center: Vec2::new(400.0, 200.0),
                size: Vec2::splat(10.0),
                rotation: 0.0,
            },
            fill,
        }
    }

    fn sprite(id: SpriteId) -> Fill {
        Fill::Sprite {
            id,
            tint: [1.0; 4],
            desaturate: false,
        }
    }

    fn scene(commands: Vec<DrawCmd>) -> Scene {
        Scene {
            commands,
            hud: HudText {
                score: String::new(),
                clock: None,
                phase: GamePhase::Running,
            },
        }
    }

    #[test]
    fn test_matching_aspect_fills_surface() {
        let vp = Viewport::new(1600, 800, world());
        assert_eq!(vp.to_ndc(Vec2::ZERO), [-1.0, 1.0]);
        assert_eq!(vp.to_ndc(world()), [1.0, -1.0]);
        assert_eq!(vp.to_ndc(world() / 2.0), [0.0, 0.0]);
    }

    #[test]
    fn test_tall_surface_letterboxes() {
        // Square surface: 2:1 canvas uses half the height
        let vp = Viewport::new(500, 500, world());
        assert_eq!(vp.to_ndc(Vec2::ZERO), [-1.0, 0.5]);
        assert_eq!(vp.to_ndc(world()), [1.0, -0.5]);
    }

    #[test]
    fn test_consecutive_fills_share_a_batch() {
        let tree = SpriteId::Tree(0);
        let scene = scene(vec![
            cmd(Layer::Background, Fill::Color([1.0; 4])),
            cmd(Layer::Trail, Fill::Color([0.5; 4])),
            cmd(Layer::Obstacles, sprite(tree)),
            cmd(Layer::Obstacles, sprite(tree)),
            cmd(Layer::Player, sprite(SpriteId::Player)),
            cmd(Layer::Overlay, Fill::Color([1.0; 4])),
        ]);
        let geometry = tessellate(&scene, &Viewport::new(800, 400, world()), 8);

        let textures: Vec<Option<SpriteId>> =
            geometry.batches.iter().map(|b| b.texture).collect();
        assert_eq!(
            textures,
            vec![None, Some(tree), Some(SpriteId::Player), None]
        );
        assert_eq!(geometry.batches[1].vertices, 12..24);
        assert_eq!(geometry.vertices.len(), 36);
    }

    #[test]
    fn test_desaturate_flag_reaches_vertices() {
        let scene = scene(vec![cmd(
            Layer::Overlay,
            Fill::Sprite {
                id: SpriteId::Heart,
                tint: [1.0, 1.0, 1.0, 0.3],
                desaturate: true,
            },
        )]);
        let geometry = tessellate(&scene, &Viewport::new(800, 400, world()), 8);
        assert!(
            geometry
                .vertices
                .iter()
                .all(|v| v.desaturate == 1.0 && v.color[3] == 0.3)
        );
    }
}
