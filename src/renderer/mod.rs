//! WebGPU rendering module
//!
//! `scene` and `batch` are plain data transforms and run anywhere;
//! `pipeline` owns the GPU side.

pub mod batch;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, SpriteRenderState};
pub use scene::{HudText, Scene, build_scene};
