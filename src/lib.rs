//! Slope Runner - an endless downhill runner with an encroaching avalanche
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, avalanche, collisions)
//! - `session`: Session lifecycle, frame tickets and end-of-run reporting
//! - `input`: Normalisation of keyboard/pointer/touch into ascend edges
//! - `assets`: Sprite acquisition with explicit fallback chains
//! - `renderer`: Scene building and the WebGPU sprite pipeline
//! - `platform`: Frame clock for headless runs; browser glue (image fetch, events)
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::{SpriteId, SpriteManifest, SpriteSet};
pub use session::{FrameOutcome, FrameTicket, Session};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh the frame-driven timers are tuned for
    pub const TARGET_FPS: f64 = 60.0;
    /// Duration of one nominal frame in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / TARGET_FPS;

    /// Logical canvas resolution (world units == logical pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Lives at the start of every session
    pub const START_LIVES: u8 = 3;
}

/// Format whole seconds as `mm:ss` for the HUD clock
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(3600), "60:00");
    }
}
