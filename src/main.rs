//! Starship Neon entry point
//!
//! In the browser this wires DOM events, assets and audio to the session and
//! drives the animation loop. Natively it runs a headless soak of the
//! simulation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent, TouchEvent, Window};

    use starship_neon::audio::{AudioManager, SoundEffect};
    use starship_neon::consts::RESIZE_DEBOUNCE_MS;
    use starship_neon::platform::assets::{self, ParallaxSetup};
    use starship_neon::platform::dom::{self, ids};
    use starship_neon::platform::{InputState, PlatformError};
    use starship_neon::renderer::{CanvasRenderer, scene};
    use starship_neon::session::hud_text;
    use starship_neon::sim::Viewport;
    use starship_neon::{QualityPreset, Session, SessionToken, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        /// Pending debounced resize
        resize_timer: Option<i32>,
        /// Last whole second written to the HUD
        hud_secs: Option<u64>,
    }

    impl Game {
        fn running(&self) -> bool {
            self.session.is_running()
        }

        /// Resize the canvas to the window and rescale the world
        fn apply_resize(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let viewport = window_viewport(&window);
            self.renderer
                .resize(viewport.width, viewport.height, window.device_pixel_ratio());
            self.session.resize(viewport);
        }

        fn update_hud(&mut self) {
            let secs = self.session.world.survived_secs();
            if self.hud_secs != Some(secs) {
                dom::set_text(ids::HUD, &hud_text(secs));
                self.hud_secs = Some(secs);
            }
        }
    }

    fn window_viewport(window: &Window) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        Viewport::new(dim(window.inner_width()) as f32, dim(window.inner_height()) as f32)
    }

    /// `?quality=low|medium|high`
    fn quality_override(window: &Window) -> Option<QualityPreset> {
        let search = window.location().search().ok()?;
        search
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("quality="))
            .and_then(QualityPreset::parse)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        // The same bundle is imported by the service worker, which has no window
        let Some(window) = web_sys::window() else {
            return;
        };

        log::info!("Starship Neon starting...");
        if let Err(e) = boot(window).await {
            log::error!("Startup failed: {}", e);
            dom::alert(&format!("Starship Neon could not start: {}", e));
        }
    }

    async fn boot(window: Window) -> Result<(), PlatformError> {
        let tuning = Tuning::load();
        let mut settings = Settings::load();
        if let Some(quality) = quality_override(&window) {
            log::info!("Quality override: {}", quality.as_str());
            settings.quality = quality;
            settings.save();
        }

        let canvas: HtmlCanvasElement = dom::element(ids::CANVAS)?
            .dyn_into()
            .map_err(|_| PlatformError::MissingElement(ids::CANVAS))?;
        let renderer = CanvasRenderer::new(canvas.clone())?;
        let sprite_wait = tuning.sprite_wait_ms;

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(tuning, &settings, window_viewport(&window), seed);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            input: InputState::new(),
            renderer,
            audio: AudioManager::new(&settings),
            settings,
            resize_timer: None,
            hud_secs: None,
        }));
        game.borrow_mut().apply_resize();

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());
        setup_focus(game.clone());

        let (ship, enemy) = assets::load_sprites(sprite_wait).await;
        {
            let mut g = game.borrow_mut();
            g.renderer.images.ship = ship;
            g.renderer.images.enemy = enemy;
        }

        dom::set_visible(ids::START_SCREEN, true)?;
        log::info!("Starship Neon ready");
        Ok(())
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Launch {
        Start,
        Restart,
    }

    /// Start or restart, surfacing unexpected failures to the player
    async fn launch(game: Rc<RefCell<Game>>, kind: Launch) {
        if let Err(e) = try_launch(game, kind).await {
            log::error!("{:?} failed: {}", kind, e);
            dom::alert(&format!("Could not start the game: {}", e));
        }
    }

    async fn try_launch(game: Rc<RefCell<Game>>, kind: Launch) -> Result<(), PlatformError> {
        let (token, tuning, parallax_enabled, need_sprites) = {
            let mut g = game.borrow_mut();
            if g.running() {
                return Ok(());
            }
            let images = &g.renderer.images;
            let need_sprites = images.ship.is_none() || images.enemy.is_none();
            let parallax_enabled = g.settings.quality.parallax_enabled();
            let tuning = g.session.world.tuning.clone();
            (g.session.claim_token(), tuning, parallax_enabled, need_sprites)
        };

        let parallax = if parallax_enabled {
            assets::setup_parallax(tuning.parallax_wait_ms).await
        } else {
            ParallaxSetup::gradient()
        };
        let sprites = if need_sprites {
            Some(assets::load_sprites(tuning.sprite_wait_ms).await)
        } else {
            None
        };
        if !game.borrow().session.is_current(token) {
            log::debug!("Start {} superseded during preload", token.value());
            return Ok(());
        }

        if kind == Launch::Start {
            let canvas = dom::element(ids::CANVAS)?;
            if let Err(e) = dom::request_fullscreen(&canvas).await {
                log::warn!("{}", e);
            }
            if !game.borrow().session.is_current(token) {
                return Ok(());
            }
        }

        dom::set_visible(ids::START_SCREEN, false)?;
        dom::set_visible(ids::GAME_OVER, false)?;

        let music = {
            let mut g = game.borrow_mut();
            let tile_size = parallax.tile_size();
            g.session.world.parallax.set_tile(parallax.choice, tile_size);
            g.renderer.images.tile = parallax.image;
            if let Some((ship, enemy)) = sprites {
                if g.renderer.images.ship.is_none() {
                    g.renderer.images.ship = ship;
                }
                if g.renderer.images.enemy.is_none() {
                    g.renderer.images.enemy = enemy;
                }
            }

            g.apply_resize();
            g.input.clear_pending();
            let viewport = g.session.world.viewport;
            if let Err(e) = g.session.begin(token, viewport) {
                log::warn!("Start {} rejected: {}", token.value(), e);
                return Ok(());
            }
            g.hud_secs = None;
            g.update_hud();
            g.audio.start_music()
        };

        dom::set_visible(ids::HUD, true)?;
        request_animation_frame(game, token);

        if let Err(e) = music.await {
            log::warn!("{}", e);
        }
        Ok(())
    }

    fn menu(game: &Rc<RefCell<Game>>) {
        game.borrow_mut().session.menu();
        dom::show(ids::GAME_OVER, false);
        dom::show(ids::START_SCREEN, true);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, token: SessionToken) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, token, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, token: SessionToken, time: f64) {
        let events = {
            let mut g = game.borrow_mut();
            if !g.session.is_current(token) {
                return;
            }
            let input = g.input.take();
            let availability = g.renderer.images.availability();
            let Game {
                session, renderer, ..
            } = &mut *g;
            let Some(events) = session.frame(&input, time, |world| {
                renderer.draw(&scene::build(world, &availability));
            }) else {
                return;
            };

            if events.shots > 0 {
                g.audio.play(SoundEffect::Blaster);
            }
            g.update_hud();
            events
        };

        if events.ship_destroyed {
            game_over(game, token);
        } else {
            request_animation_frame(game, token);
        }
    }

    /// Stop music, hide the HUD, then show the summary after a short delay
    fn game_over(game: Rc<RefCell<Game>>, token: SessionToken) {
        let delay = {
            let mut g = game.borrow_mut();
            g.audio.stop_music();
            g.input.blur();
            g.session.world.tuning.game_over_delay_ms
        };
        dom::show(ids::HUD, false);

        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move || {
            let g = game.borrow();
            if !g.session.is_current(token) || g.running() {
                return;
            }
            let summary = g.session.summary();
            log::info!("Game over after {} seconds", summary.seconds);
            dom::set_text(ids::GAME_OVER_SCORE, &summary.text());
            dom::show(ids::GAME_OVER, true);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        );
        closure.forget();
    }

    fn on_click(id: &'static str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        match dom::element(id) {
            Ok(el) => {
                let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
                let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(ids::START_BUTTON, move |_| {
                wasm_bindgen_futures::spawn_local(launch(game.clone(), Launch::Start));
            });
        }
        {
            let game = game.clone();
            on_click(ids::RESTART_BUTTON, move |_| {
                wasm_bindgen_futures::spawn_local(launch(game.clone(), Launch::Restart));
            });
        }
        on_click(ids::MENU_BUTTON, move |_| menu(&game));
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            if let Some(handle) = game.borrow_mut().resize_timer.take() {
                window.clear_timeout_with_handle(handle);
            }
            let game_for_timer = game.clone();
            let apply = Closure::once(move || {
                let mut g = game_for_timer.borrow_mut();
                g.resize_timer = None;
                g.apply_resize();
            });
            let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                apply.as_ref().unchecked_ref(),
                RESIZE_DEBOUNCE_MS,
            );
            apply.forget();
            game.borrow_mut().resize_timer = handle.ok();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_focus(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Blur: held keys never see their keyup
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.blur();
                let mute = g.settings.mute_on_blur;
                g.audio.suspend(mute);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.running() {
                    g.audio.resume();
                }
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn first_touch(event: &TouchEvent) -> Option<Vec2> {
        event
            .touches()
            .get(0)
            .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Pointer down (mouse/pen; touch has its own handlers)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.pointer_type() == "touch" {
                    return;
                }
                let mut g = game.borrow_mut();
                let running = g.running();
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                g.input.pointer_down(pos, running);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.pointer_type() == "touch" {
                    return;
                }
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().input.pointer_move(pos);
            });
            let _ = window
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up / cancel
        for name in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch handlers must be non-passive to suppress scrolling
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let running = g.running();
                if running {
                    event.prevent_default();
                }
                g.input.touch_start(first_touch(&event), running);
            });
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if g.running() {
                    event.prevent_default();
                }
                g.input.touch_move(first_touch(&event));
            });
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Touch end / cancel
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.touch_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let running = g.running();
                if g.input.key_down(&event.key(), &event.code(), running) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key(), &event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// The browser entry point is `wasm_main`
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    headless::soak(0x5EED, 60 * 60 * 5);
}

/// Native stand-in for the browser: one auto-firing session at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use starship_neon::session::hud_text;
    use starship_neon::sim::{TickInput, Viewport};
    use starship_neon::{Session, Settings, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub fn soak(seed: u64, max_frames: u32) {
        let viewport = Viewport::new(900.0, 800.0);
        let mut session = Session::new(Tuning::load(), &Settings::load(), viewport, seed);
        let token = session.claim_token();
        if let Err(e) = session.begin(token, viewport) {
            log::error!("Headless session failed to start: {}", e);
            return;
        }

        let input = TickInput {
            fire: true,
            ..TickInput::default()
        };
        let (mut shots, mut kills, mut spawned) = (0u64, 0u64, 0u64);
        let mut frames = 0;
        while frames < max_frames {
            let Some(events) = session.step(&input, FRAME_MS) else {
                break;
            };
            shots += events.shots as u64;
            kills += events.kills as u64;
            spawned += events.spawned as u64;
            frames += 1;
        }

        let summary = session.summary();
        log::info!(
            "{} after {} frames ({:?}): {} shots, {} spawned, {} destroyed",
            hud_text(summary.seconds),
            frames,
            session.phase(),
            shots,
            spawned,
            kills
        );
        println!("Survived {}", summary.text());
    }
}
