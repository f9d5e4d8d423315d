//! Shape generation for 2D primitives
//!
//! All output is in logical canvas pixels (y down); `batch` maps to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Textured quad rotated about its center; uv spans the whole texture
pub fn quad(center: Vec2, size: Vec2, rotation: f32, color: [f32; 4], desaturate: f32) -> [Vertex; 6] {
    let half = size / 2.0;
    let rot = Vec2::from_angle(rotation);
    let corner = |x: f32, y: f32, u: f32, v: f32| {
        let p = center + rot.rotate(Vec2::new(x, y));
        Vertex::new(p.x, p.y, u, v, color, desaturate)
    };

    let tl = corner(-half.x, -half.y, 0.0, 0.0);
    let tr = corner(half.x, -half.y, 1.0, 0.0);
    let bl = corner(-half.x, half.y, 0.0, 1.0);
    let br = corner(half.x, half.y, 1.0, 1.0);

    [tl, bl, tr, tr, bl, br]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::flat(center.x, center.y, color));
        vertices.push(Vertex::flat(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::flat(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Ski trail strip; points are newest first and fade out toward the tail
pub fn trail(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 1) * 6);
    let len = points.len() as f32;
    let [r, g, b, a] = color;

    for (i, pair) in points.windows(2).enumerate() {
        let (p1, p2) = (pair[0], pair[1]);

        // Fade alpha and width along trail
        let t1 = i as f32 / len;
        let t2 = (i + 1) as f32 / len;
        let color1 = [r, g, b, a * (1.0 - t1)];
        let color2 = [r, g, b, a * (1.0 - t2)];
        let width1 = width * (1.0 - t1 * 0.5) / 2.0;
        let width2 = width * (1.0 - t2 * 0.5) / 2.0;

        let dir = (p2 - p1).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x);

        let v1a = p1 + perp * width1;
        let v1b = p1 - perp * width1;
        let v2a = p2 + perp * width2;
        let v2b = p2 - perp * width2;

        vertices.push(Vertex::flat(v1a.x, v1a.y, color1));
        vertices.push(Vertex::flat(v1b.x, v1b.y, color1));
        vertices.push(Vertex::flat(v2a.x, v2a.y, color2));

        vertices.push(Vertex::flat(v2a.x, v2a.y, color2));
        vertices.push(Vertex::flat(v1b.x, v1b.y, color1));
        vertices.push(Vertex::flat(v2b.x, v2b.y, color2));
    }

    vertices
}
