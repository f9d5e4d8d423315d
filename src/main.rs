//! Slope Runner entry point
//!
//! Browser builds mount the game on `#canvas`; native builds run a
//! headless session and print the report as JSON.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent, TouchEvent};

    use slope_runner::input::{self, InputEvent, KeyState};
    use slope_runner::platform::web;
    use slope_runner::renderer::{HudText, SpriteRenderState, build_scene};
    use slope_runner::sim::GamePhase;
    use slope_runner::{FrameOutcome, FrameTicket, Session, Settings, SpriteManifest, Tuning};

    /// Bundled copies served next to the page
    const LOCAL_SPRITES: &str = "assets";
    /// Used when the page does not set `data-sprite-base`
    const DEFAULT_REMOTE_SPRITES: &str = "sprites";

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<SpriteRenderState>,
        settings: Settings,
        last_hud: Option<HudText>,
    }

    impl Game {
        fn handle(&mut self, event: InputEvent) {
            self.session.handle(event, web::now_ms());
        }

        /// Render the current frame
        fn render(&mut self, now_ms: f64) {
            let scene = build_scene(
                self.session.state(),
                self.session.sprites(),
                &self.settings,
                now_ms,
            );
            if let Some(ref mut render_state) = self.render_state {
                let segments = self.settings.quality.circle_segments();
                match render_state.render(&scene, segments) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            self.update_hud(scene.hud);
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, hud: HudText) {
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.score));
            }

            if let Some(el) = document.get_element_by_id("hud-time") {
                match &hud.clock {
                    Some(clock) => {
                        let _ = el.set_attribute("class", "hud-item");
                        if let Some(val) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                            val.set_text_content(Some(clock));
                        }
                    }
                    None => {
                        let _ = el.set_attribute("class", "hud-item hidden");
                    }
                }
            }

            // Show/hide start prompt
            if let Some(el) = document.get_element_by_id("start-prompt") {
                let class = if hud.phase == GamePhase::NotStarted {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if hud.game_over() {
                    let _ = el.set_attribute("class", "");
                    if let Some(report) = self.session.state().report() {
                        if let Some(score_el) = document.get_element_by_id("final-score") {
                            score_el.set_text_content(Some(&report.score.to_string()));
                        }
                        if let Some(time_el) = document.get_element_by_id("final-time") {
                            time_el.set_text_content(Some(&slope_runner::format_clock(report.game_time)));
                        }
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            self.last_hud = Some(hud);
        }

        fn cycle_quality(&mut self) {
            let next = self.settings.quality.next();
            self.settings.apply_preset(next);
            self.settings.save();
            log::info!("Quality: {}", next.as_str());
        }
    }

    fn js_err(err: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Slope Runner starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()
            .map_err(|_| js_err("not a canvas"))?;

        // Page-provided balance overrides
        let tuning = match canvas.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring data-tuning: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Sprites first: the loop is only armed once every chain has resolved
        let remote = canvas
            .get_attribute("data-sprite-base")
            .unwrap_or_else(|| DEFAULT_REMOTE_SPRITES.to_string());
        let manifest = SpriteManifest::standard(
            &remote,
            LOCAL_SPRITES,
            tuning.tree_variants,
            tuning.snowman_variants,
        );
        let sprites = web::acquire_sprites(&manifest).await;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let world = glam::Vec2::new(tuning.canvas_width, tuning.canvas_height);
        let mut render_state = SpriteRenderState::new(surface, &adapter, width, height, world)
            .await
            .map_err(js_err)?;
        render_state.upload_sprites(&sprites);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(tuning, seed, sprites, web::now_ms());
        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: Some(render_state),
            settings: Settings::load(),
            last_hud: None,
        }));

        setup_input_handlers(&canvas, game.clone())?;

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        let ticket = game.borrow().session.ticket();
        request_animation_frame(game, ticket);
        log::info!("Slope Runner running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if matches!(key.as_str(), " " | "ArrowUp") {
                    // Keep the page from scrolling
                    event.prevent_default();
                }
                if matches!(key.as_str(), "q" | "Q") && !event.repeat() {
                    game.borrow_mut().cycle_quality();
                    return;
                }
                if let Some(input) = input::from_key(&key, KeyState::Down, event.repeat()) {
                    dispatch(&game, input);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(input) = input::from_key(&event.key(), KeyState::Up, false) {
                    dispatch(&game, input);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer press/release (mouse, pen)
        for (name, pressed) in [
            ("pointerdown", true),
            ("pointerup", false),
            ("pointercancel", false),
            ("pointerleave", false),
        ] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                dispatch(&game, input::from_press(pressed));
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch (no synthetic mouse events, no scrolling)
        for (name, pressed) in [("touchstart", true), ("touchend", false), ("touchcancel", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                dispatch(&game, input::from_press(pressed));
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Feed one event to the session; a reset arms a fresh loop
    fn dispatch(game: &Rc<RefCell<Game>>, event: InputEvent) {
        let ticket = {
            let mut g = game.borrow_mut();
            let before = g.session.generation();
            g.handle(event);
            (g.session.generation() != before).then(|| g.session.ticket())
        };
        // The old loop sees a stale ticket on its next frame and stops
        if let Some(ticket) = ticket {
            request_animation_frame(game.clone(), ticket);
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, ticket);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        let now = web::now_ms();
        {
            let mut g = game.borrow_mut();
            match g.session.frame(ticket, now) {
                FrameOutcome::Cancelled => {
                    log::debug!("Frame loop {:?} retired", ticket);
                    return;
                }
                FrameOutcome::Continue(_) => {}
                FrameOutcome::Finished(report) => {
                    if let Err(e) = web::dispatch_game_over(&report) {
                        log::error!("Failed to report game over: {:?}", e);
                    }
                }
            }
            g.render(now);
        }

        request_animation_frame(game, ticket);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Slope Runner failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;

    use slope_runner::input::InputEvent;
    use slope_runner::platform::FrameClock;
    use slope_runner::renderer::{batch, build_scene};
    use slope_runner::{FrameOutcome, QualityPreset, Session, Settings, SpriteSet, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "slope-runner")]
    #[command(about = "Run a headless Slope Runner session and print the report as JSON")]
    pub struct Cli {
        /// RNG seed for obstacle placement and avalanche particles
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Give up after this many frames
        #[arg(long, default_value_t = 36_000)]
        frames: u64,
        /// JSON file with tuning overrides
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Steer with the demo autopilot instead of coasting
        #[arg(long)]
        autopilot: bool,
        /// Synthetic display refresh rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Quality preset used for the final render statistics
        #[arg(long, default_value = "medium")]
        quality: String,
    }

    pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
        let tuning = match &cli.tuning {
            Some(path) => Tuning::from_json(&fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };
        let quality = QualityPreset::parse(&cli.quality)
            .ok_or_else(|| format!("unknown quality preset '{}'", cli.quality))?;

        let mut clock = FrameClock::new(cli.fps);
        let mut session = Session::new(tuning, cli.seed, SpriteSet::empty(), clock.now_ms());
        session.handle(
            if cli.autopilot {
                InputEvent::ToggleDemo
            } else {
                InputEvent::Start
            },
            clock.now_ms(),
        );

        let ticket = session.ticket();
        let mut report = None;
        for _ in 0..cli.frames {
            match session.frame(ticket, clock.advance()) {
                FrameOutcome::Finished(r) => {
                    report = Some(r);
                    break;
                }
                FrameOutcome::Continue(events) => {
                    if events.life_lost {
                        log::info!(
                            "Frame {}: life lost, {} left",
                            session.state().frame_count,
                            session.state().lives
                        );
                    }
                }
                FrameOutcome::Cancelled => return Err("frame ticket went stale".into()),
            }
        }

        let state = session.state();
        let settings = Settings::from_preset(quality);
        let scene = build_scene(state, session.sprites(), &settings, clock.now_ms());
        let viewport = batch::Viewport::new(
            state.tuning.canvas_width as u32,
            state.tuning.canvas_height as u32,
            glam::Vec2::new(state.tuning.canvas_width, state.tuning.canvas_height),
        );
        let geometry = batch::tessellate(&scene, &viewport, quality.circle_segments());
        log::info!(
            "Final frame: {} draw commands, {} vertices in {} batches ({})",
            scene.commands.len(),
            geometry.vertices.len(),
            geometry.batches.len(),
            quality.as_str()
        );

        match report {
            Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            None => {
                log::warn!("Still running after {} frames", cli.frames);
                let partial = serde_json::json!({
                    "finished": false,
                    "score": state.score,
                    "frames": state.frame_count,
                    "lives": state.lives,
                });
                println!("{}", serde_json::to_string_pretty(&partial)?);
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;

    env_logger::init();
    log::info!("Slope Runner (headless) starting...");
    headless::run(headless::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
