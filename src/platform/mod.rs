//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (performance clock on web, synthetic frame clock headless)
//! - Sprite fetching (HtmlImageElement decode on web)
//! - Reporting the end of a run to the embedding page

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::TARGET_FPS;

/// Deterministic clock advancing one frame per call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    frame: u64,
    frame_ms: f64,
}

impl FrameClock {
    pub fn new(fps: f64) -> Self {
        let fps = if fps > 0.0 { fps } else { TARGET_FPS };
        Self {
            frame: 0,
            frame_ms: 1000.0 / fps,
        }
    }

    /// Current time in ms
    pub fn now_ms(&self) -> f64 {
        self.frame as f64 * self.frame_ms
    }

    /// Step one frame and return the new time
    pub fn advance(&mut self) -> f64 {
        self.frame += 1;
        self.now_ms()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TARGET_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_steps() {
        let mut clock = FrameClock::new(50.0);
        assert_eq!(clock.now_ms(), 0.0);
        assert_eq!(clock.advance(), 20.0);
        assert_eq!(clock.advance(), 40.0);
    }

    #[test]
    fn test_invalid_rate_uses_target() {
        let mut clock = FrameClock::new(0.0);
        assert_eq!(clock, FrameClock::default());
        assert!((clock.advance() - 1000.0 / 60.0).abs() < 1e-9);
    }
}
