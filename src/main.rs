//! CEO Flight entry point
//!
//! In the browser this wires the page (canvas, HUD, input) to the game loop.
//! Natively it runs a headless demo flown by the autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use ceo_flight::assets::SpriteHandle;
    use ceo_flight::platform::web::{AnimationFrameScheduler, load_sprite};
    use ceo_flight::renderer::{CeoSprites, PresentState};
    use ceo_flight::session::Screen;
    use ceo_flight::{Game, Session, Settings};

    const SPRITE_URL: &str = "assets/ceo.png";

    /// What the HUD currently shows
    #[derive(Clone, Copy, PartialEq, Eq)]
    struct HudView {
        score: u32,
        best: u32,
        screen: Screen,
    }

    /// Everything the page callbacks share
    struct App {
        game: Game,
        session: Session,
        scheduler: AnimationFrameScheduler,
        present: Option<PresentState>,
        shown: Option<HudView>,
    }

    impl App {
        fn frame(&mut self) {
            let signals = self.session.signals();
            if !self
                .game
                .on_frame(&mut self.scheduler, signals, &mut self.session)
            {
                return;
            }
            self.present();
            self.update_hud();
        }

        fn present(&mut self) {
            let Some(present) = self.present.as_mut() else {
                return;
            };
            match present.present(self.game.frame()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    present.resize(present.size.0, present.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Present error: {:?}", e),
            }
        }

        fn stop(&mut self) {
            self.game.stop(&mut self.scheduler);
            log::info!("Game loop stopped");
        }

        /// Mirror score and screen into the DOM, only when they change
        fn update_hud(&mut self) {
            let view = HudView {
                score: self.session.score(),
                best: self.session.best(),
                screen: self.session.screen(),
            };
            if self.shown == Some(view) {
                return;
            }
            self.shown = Some(view);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            set_text(&document, "score", &view.score.to_string());
            set_text(&document, "best", &view.best.to_string());
            set_visible(&document, "start-screen", view.screen == Screen::Start);
            set_visible(&document, "game-over", view.screen == Screen::GameOver);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("CEO Flight starting...");
        if let Err(e) = start().await {
            log::error!("CEO Flight failed to start: {e:#}");
        }
    }

    async fn start() -> anyhow::Result<()> {
        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no #canvas element")?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;
        let (width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // One image for both poses; the renderer tints it after a crash
        let sprite = SpriteHandle::pending();
        if let Err(e) = load_sprite(SPRITE_URL, sprite.clone()) {
            sprite.fail(&format!("{e:?}"));
        }
        let sprites = CeoSprites::shared(sprite);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::default();
        let game = Game::new(settings, seed, sprites);
        let frame_size = (game.frame().width(), game.frame().height());

        // The game still runs (and the HUD updates) without a GPU
        let present = match init_present(canvas.clone(), width, height, frame_size).await {
            Ok(present) => Some(present),
            Err(e) => {
                log::error!("WebGPU unavailable: {e:#}");
                None
            }
        };

        let app = Rc::new(RefCell::new(App {
            game,
            session: Session::new(),
            scheduler: AnimationFrameScheduler::new(window.clone()),
            present,
            shown: None,
        }));

        let callback = {
            let app = app.clone();
            Closure::<dyn FnMut(f64)>::new(move |_time: f64| app.borrow_mut().frame())
        };
        app.borrow_mut().scheduler.set_callback(callback);

        setup_input_handlers(&canvas, app.clone());
        setup_resize(canvas, app.clone());
        setup_pagehide(app.clone());

        {
            let mut a = app.borrow_mut();
            let a = &mut *a;
            a.update_hud();
            a.game.start(&mut a.scheduler);
        }

        log::info!("CEO Flight running!");
        Ok(())
    }

    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    async fn init_present(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        frame_size: (u32, u32),
    ) -> anyhow::Result<PresentState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| anyhow!("failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("failed to get adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);
        PresentState::new(surface, &adapter, width, height, frame_size).await
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Space / ArrowUp jump, Escape leaves for the start screen
        if let Some(window) = web_sys::window() {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.code().as_str() {
                    "Space" | "ArrowUp" => {
                        event.prevent_default();
                        app.borrow_mut().session.press();
                    }
                    "Escape" => app.borrow_mut().session.back_to_start(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().session.press();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap; suppress the synthetic mousedown that would jump twice
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().session.press();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(present) = app.borrow_mut().present.as_mut() {
                present.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Tear the loop down when the page goes away
    fn setup_pagehide(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PageTransitionEvent| {
            app.borrow_mut().stop();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Frames the headless demo runs at most (one minute at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAME_LIMIT: u64 = 3600;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::Context;
    use ceo_flight::platform::native::FixedRateScheduler;
    use ceo_flight::renderer::CeoSprites;
    use ceo_flight::session::Screen;
    use ceo_flight::sim::autopilot;
    use ceo_flight::{Game, Session, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("CEO Flight (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_from(&path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => Settings::default(),
    };
    let frame_limit = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("invalid frame limit {arg:?}"))?,
        None => DEFAULT_FRAME_LIMIT,
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut game = Game::new(settings, seed, CeoSprites::default());
    let mut session = Session::new();
    let mut scheduler = FixedRateScheduler::with_rate(60);

    session.press();
    game.start(&mut scheduler);

    let mut frames = 0u64;
    while scheduler.wait_next().is_some() {
        if autopilot::wants_jump(game.state(), game.settings()) {
            session.press();
        }
        game.on_frame(&mut scheduler, session.signals(), &mut session);
        frames += 1;

        if session.screen() == Screen::GameOver || frames >= frame_limit {
            game.stop(&mut scheduler);
        }
    }

    log::info!(
        "Finished after {} frames: score {}, best {}",
        frames,
        session.score(),
        session.best()
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
