//! Session lifecycle
//!
//! Owns the `GameState`, the seeded rng, the latched input and the loaded
//! sprites. Frame callbacks carry a `FrameTicket`; a reset bumps the
//! generation so any loop still holding an old ticket is refused and
//! stops re-arming itself.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::assets::SpriteSet;
use crate::input::InputEvent;
use crate::sim::{GamePhase, GameState, SessionReport, TickEvents, TickInput, autopilot, tick};
use crate::tuning::Tuning;

/// Proof that a frame callback belongs to the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket(u64);

/// Result of one frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Ticket is stale; the caller must stop its loop
    Cancelled,
    /// Keep requesting frames
    Continue(TickEvents),
    /// The session just ended (reported exactly once)
    Finished(SessionReport),
}

pub struct Session {
    tuning: Tuning,
    seed: u64,
    generation: u64,
    state: GameState,
    rng: Pcg32,
    input: TickInput,
    sprites: SpriteSet,
    demo: bool,
    reported: bool,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64, sprites: SpriteSet, now_ms: f64) -> Self {
        log::info!("Session created with seed {}", seed);
        Self {
            state: GameState::new(tuning.clone(), now_ms),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            seed,
            generation: 0,
            input: TickInput::default(),
            sprites,
            demo: false,
            reported: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }

    pub fn demo(&self) -> bool {
        self.demo
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ticket(&self) -> FrameTicket {
        FrameTicket(self.generation)
    }

    /// Apply a normalised input event
    pub fn handle(&mut self, event: InputEvent, now_ms: f64) {
        match event {
            InputEvent::AscendStart => {
                self.input.ascending = true;
                self.state.start(now_ms);
            }
            InputEvent::AscendEnd => self.input.ascending = false,
            InputEvent::Start => {
                self.state.start(now_ms);
            }
            InputEvent::Reset => self.reset(now_ms),
            InputEvent::ToggleDemo => {
                self.demo = !self.demo;
                log::info!("Demo mode: {}", self.demo);
                if self.demo {
                    self.state.start(now_ms);
                }
            }
        }
    }

    /// Fresh `NotStarted` state; sprites survive, outstanding tickets die
    pub fn reset(&mut self, now_ms: f64) {
        self.generation += 1;
        self.state = GameState::new(self.tuning.clone(), now_ms);
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.generation));
        self.input = TickInput::default();
        self.reported = false;
        log::info!("Session reset (generation {})", self.generation);
    }

    /// Advance one frame on behalf of the loop holding `ticket`
    pub fn frame(&mut self, ticket: FrameTicket, now_ms: f64) -> FrameOutcome {
        if ticket.0 != self.generation {
            return FrameOutcome::Cancelled;
        }

        let input = if self.demo && self.state.phase == GamePhase::Running {
            autopilot::steer(&self.state)
        } else {
            self.input
        };
        let events = tick(&mut self.state, &input, &mut self.rng, now_ms);

        match self.state.report() {
            Some(report) if !self.reported => {
                self.reported = true;
                FrameOutcome::Finished(report)
            }
            _ => FrameOutcome::Continue(events),
        }
    }
}
