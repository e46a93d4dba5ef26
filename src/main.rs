//! Nova Rush entry point
//!
//! In the browser this wires the frame scheduler to a 2D canvas, Web Audio
//! cues and keyboard listeners. Natively it plays a short scripted headless
//! run, which is handy for checking a configuration file.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use nova_rush::audio::WebAudioCues;
    use nova_rush::input::{InputQueue, KeyState};
    use nova_rush::render::{Renderer, Shape, Style};
    use nova_rush::ui::{LogOverlay, OverlayView};
    use nova_rush::{CapabilityError, FrameOutcome, FrameScheduler, GameConfig};

    const BACKEND: &str = "canvas2d";
    const CANVAS_ID: &str = "gameCanvas";

    fn js_err(e: JsValue) -> CapabilityError {
        CapabilityError::new(BACKEND, format!("{e:?}"))
    }

    /// Draws shapes onto a 2D canvas context
    struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
        arena: Vec2,
    }

    impl CanvasRenderer {
        /// Paint the overlay card on top of the finished frame (no shake offset)
        fn draw_overlay(&self, view: &OverlayView) -> Result<(), CapabilityError> {
            let (Some(title), Some(score)) = (view.title(), view.score()) else {
                return Ok(());
            };
            let ctx = &self.ctx;
            let (w, h) = (self.arena.x as f64, self.arena.y as f64);
            ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
                .map_err(js_err)?;

            ctx.set_fill_style_str("rgba(0,0,0,0.7)");
            ctx.fill_rect(0.0, 0.0, w, h);

            ctx.set_fill_style_str("white");
            ctx.set_text_align("center");
            ctx.set_font("40px Arial");
            ctx.fill_text(&title, w / 2.0, h / 2.0 - 40.0).map_err(js_err)?;
            ctx.set_font("24px Arial");
            ctx.fill_text(&format!("Score: {score}"), w / 2.0, h / 2.0)
                .map_err(js_err)?;

            let hint = if view.can_resume() {
                "Esc to resume, R to restart"
            } else {
                "R to restart"
            };
            ctx.set_font("18px Arial");
            ctx.fill_text(hint, w / 2.0, h / 2.0 + 40.0).map_err(js_err)?;
            ctx.set_text_align("start");
            Ok(())
        }
    }

    impl Renderer for CanvasRenderer {
        fn begin_frame(&mut self, arena: Vec2, offset: Vec2) -> Result<(), CapabilityError> {
            self.arena = arena;
            let ctx = &self.ctx;
            ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
                .map_err(js_err)?;
            ctx.set_fill_style_str("black");
            ctx.fill_rect(0.0, 0.0, arena.x as f64, arena.y as f64);
            ctx.translate(offset.x as f64, offset.y as f64)
                .map_err(js_err)
        }

        fn draw(&mut self, shape: &Shape, style: &Style) -> Result<(), CapabilityError> {
            let ctx = &self.ctx;
            ctx.set_fill_style_str(&style.css());
            match shape {
                Shape::Rect { pos, size } => {
                    ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                Shape::Triangle { a, b, c } => {
                    ctx.begin_path();
                    ctx.move_to(a.x as f64, a.y as f64);
                    ctx.line_to(b.x as f64, b.y as f64);
                    ctx.line_to(c.x as f64, c.y as f64);
                    ctx.close_path();
                    ctx.fill();
                }
                Shape::Circle { center, radius } => {
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                        .map_err(js_err)?;
                    ctx.fill();
                }
                Shape::Text { pos, text, size_px } => {
                    ctx.set_font(&format!("{size_px}px Arial"));
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)
                        .map_err(js_err)?;
                }
            }
            Ok(())
        }
    }

    type Scheduler = FrameScheduler<CanvasRenderer, WebAudioCues, LogOverlay>;

    /// Browser game instance
    struct Game {
        scheduler: Scheduler,
        input: InputQueue,
        /// True while an animation frame is pending
        looping: bool,
    }

    impl Game {
        fn draw_overlay(&self) {
            let Some(view) = &self.scheduler.overlay().current else {
                return;
            };
            if let Err(e) = self.scheduler.renderer().draw_overlay(view) {
                log::debug!("Overlay draw failed: {e}");
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Nova Rush starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = GameConfig::load();
        canvas.set_width(config.arena_width as u32);
        canvas.set_height(config.arena_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let renderer = CanvasRenderer {
            ctx,
            arena: Vec2::new(config.arena_width, config.arena_height),
        };

        let seed = js_sys::Date::now() as u64;
        let scheduler = FrameScheduler::new(
            config,
            seed,
            renderer,
            WebAudioCues::new(),
            LogOverlay::default(),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Rc::new(RefCell::new(Game {
            scheduler,
            input: InputQueue::new(),
            looping: true,
        }));

        setup_keyboard(game.clone())?;
        setup_auto_pause(game.clone())?;

        request_animation_frame(game);

        log::info!("Nova Rush running!");
        Ok(())
    }

    fn handle_key(game: &Rc<RefCell<Game>>, event: &KeyboardEvent, key_state: KeyState) {
        let code = event.code();
        let wake = {
            let g = &mut *game.borrow_mut();
            if !g.input.push_key(&code, key_state) {
                return;
            }
            // Keep arrows and space from scrolling the page
            event.prevent_default();

            if key_state == KeyState::Pressed {
                g.scheduler.audio().resume();
            }

            // No frame is pending once the run has settled, so apply input here
            if g.looping {
                false
            } else {
                g.scheduler.drain_input(&mut g.input);
                let wake = !g.scheduler.is_suspended();
                g.looping = wake;
                wake
            }
        };

        if wake {
            request_animation_frame(game.clone());
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                handle_key(&game, &event, KeyState::Pressed);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                handle_key(&game, &event, KeyState::Released);
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let outcome = {
            let g = &mut *game.borrow_mut();
            g.scheduler.drain_input(&mut g.input);
            let outcome = g.scheduler.frame(time);
            g.draw_overlay();
            if outcome == FrameOutcome::Suspend {
                g.looping = false;
            }
            outcome
        };

        if outcome == FrameOutcome::Continue {
            request_animation_frame(game);
        } else {
            log::info!("Run over, waiting for restart");
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && game.borrow_mut().scheduler.auto_pause()
                {
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if game.borrow_mut().scheduler.auto_pause() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Nova Rush (native) starting...");
    log::info!("Native mode plays a scripted headless run - build for wasm32 to play");

    let config = match std::env::args().nth(1) {
        Some(path) => match load_config_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid configuration {path}: {e}");
                std::process::exit(1);
            }
        },
        None => nova_rush::GameConfig::load(),
    };

    if let Err(e) = headless::run(config, 7) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config_file(path: &str) -> Result<nova_rush::GameConfig, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    nova_rush::GameConfig::from_json(&json).map_err(|e| e.to_string())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use nova_rush::audio::NullAudio;
    use nova_rush::consts::NOMINAL_FRAME_DT_MS;
    use nova_rush::input::{InputQueue, KeyState};
    use nova_rush::render::NullRenderer;
    use nova_rush::ui::LogOverlay;
    use nova_rush::{ConfigError, FrameOutcome, FrameScheduler, GameConfig};

    /// Upper bound so a misconfigured run cannot loop forever
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Sweep left and right, firing every few frames, with one pause mid-run
    fn script(frame: u32, queue: &mut InputQueue) {
        match frame % 240 {
            0 => {
                queue.push_key("ArrowRight", KeyState::Released);
                queue.push_key("ArrowLeft", KeyState::Pressed);
            }
            120 => {
                queue.push_key("ArrowLeft", KeyState::Released);
                queue.push_key("ArrowRight", KeyState::Pressed);
            }
            _ => {}
        }
        if frame % 12 == 0 {
            queue.push_key("Space", KeyState::Pressed);
        }
        if frame == 600 || frame == 660 {
            queue.push_key("Escape", KeyState::Pressed);
        }
    }

    pub fn run(config: GameConfig, seed: u64) -> Result<(), ConfigError> {
        log::info!(
            "Timers on resume: {}, spawn every {}ms (floor {}ms)",
            config.timer_resume.as_str(),
            config.initial_spawn_interval_ms,
            config.spawn_interval_floor_ms
        );

        let mut scheduler =
            FrameScheduler::new(config, seed, NullRenderer, NullAudio, LogOverlay::default())?;
        let mut queue = InputQueue::new();

        let mut frames = 0;
        while frames < MAX_FRAMES {
            script(frames, &mut queue);
            scheduler.drain_input(&mut queue);
            let now = frames as f64 * NOMINAL_FRAME_DT_MS;
            if scheduler.frame(now) == FrameOutcome::Suspend {
                break;
            }
            frames += 1;
        }

        let state = scheduler.state();
        log::info!(
            "Finished after {frames} frames: {:?}, score {}, {:.1}s played, spawn interval {}ms",
            state.end_reason,
            state.score,
            state.clock.elapsed_secs(),
            state.difficulty.spawn_interval_ms
        );
        Ok(())
    }
}
