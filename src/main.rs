//! Nexus Defense entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent};

    use nexus_defense::Tuning;
    use nexus_defense::platform::FrameClock;
    use nexus_defense::platform::dom::{DomRenderer, Page, virus_id_of};
    use nexus_defense::sim::{Game, Hud, ShellAction};

    /// Page shell holding the game and its DOM
    struct Shell {
        game: Game<DomRenderer>,
        page: Page,
        clock: FrameClock,
        last_hud: Option<Hud>,
        last_size: (f32, f32),
    }

    impl Shell {
        /// Apply a page action and mirror the overlay/HUD
        fn dispatch(&mut self, action: ShellAction) {
            let was_open = self.game.is_overlay_open();
            self.game.handle(action);

            let open = self.game.is_overlay_open();
            if open != was_open {
                if let Err(e) = self.page.set_overlay(open) {
                    log::warn!("Overlay toggle failed: {:?}", e);
                }
            }
            self.sync_hud();
        }

        /// One animation frame
        fn frame(&mut self, time: f64) {
            // Hidden overlay reports 0x0; keep the last real size
            let size = self.page.canvas_size();
            if size != self.last_size && size.0 > 0.0 && size.1 > 0.0 {
                self.last_size = size;
                self.game.handle(ShellAction::Resize {
                    width: size.0,
                    height: size.1,
                });
            }

            let dt = self.clock.tick(time);
            self.game.advance(dt);
            for event in self.game.drain_events() {
                log::debug!("{:?}", event);
            }
            self.sync_hud();
        }

        fn sync_hud(&mut self) {
            let hud = self.game.hud();
            if self.last_hud != Some(hud) {
                if let Err(e) = self.page.apply_hud(&hud) {
                    log::warn!("HUD update failed: {:?}", e);
                }
                self.last_hud = Some(hud);
            }
        }
    }

    /// Tuning from the canvas `data-tuning` attribute, or defaults
    fn load_tuning(page: &Page) -> Tuning {
        let tuning = match page.tuning_override() {
            Some(json) => match Tuning::from_json(&json) {
                Ok(tuning) => match tuning.validate() {
                    Ok(()) => {
                        log::info!("Using tuning override from page");
                        tuning
                    }
                    Err(e) => {
                        log::warn!("Rejected tuning override: {}", e);
                        Tuning::default()
                    }
                },
                Err(e) => {
                    log::warn!("Malformed tuning override: {}", e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };

        // Fresh spawn pattern per page load unless the page pinned a seed
        if tuning.seed == Tuning::default().seed {
            let seed = js_sys::Date::now() as u64;
            tuning.with_seed(seed)
        } else {
            tuning
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Nexus Defense starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let page = Page::find(document.clone())?;
        let tuning = load_tuning(&page);
        log::info!("Game initialized with seed: {}", tuning.seed);

        let renderer = DomRenderer::new(document, page.canvas.clone());
        let game = Game::new(tuning, renderer).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let shell = Rc::new(RefCell::new(Shell {
            game,
            page,
            clock: FrameClock::new(),
            last_hud: None,
            last_size: (0.0, 0.0),
        }));

        setup_buttons(&shell)?;
        setup_canvas_clicks(&shell)?;
        setup_keyboard(&window, &shell)?;

        shell.borrow_mut().sync_hud();
        request_animation_frame(shell);

        log::info!("Nexus Defense running!");
        Ok(())
    }

    fn on_click(
        target: &HtmlElement,
        shell: &Rc<RefCell<Shell>>,
        action: ShellAction,
    ) -> Result<(), JsValue> {
        let shell = shell.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            shell.borrow_mut().dispatch(action.clone());
        });
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(shell: &Rc<RefCell<Shell>>) -> Result<(), JsValue> {
        let buttons = {
            let s = shell.borrow();
            [
                (s.page.open_button.clone(), ShellAction::Open),
                (s.page.close_button.clone(), ShellAction::Close),
                (s.page.start_button.clone(), ShellAction::Start),
                (s.page.restart_button.clone(), ShellAction::Restart),
            ]
        };
        for (button, action) in buttons {
            on_click(&button, shell, action)?;
        }
        Ok(())
    }

    /// One delegated handler for every virus on the canvas
    fn setup_canvas_clicks(shell: &Rc<RefCell<Shell>>) -> Result<(), JsValue> {
        let canvas = shell.borrow().page.canvas.clone();
        let shell = shell.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if let Some(id) = virus_id_of(&target) {
                shell.borrow_mut().dispatch(ShellAction::Activate(id));
            }
        });
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, shell: &Rc<RefCell<Shell>>) -> Result<(), JsValue> {
        let shell = shell.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            shell.borrow_mut().dispatch(ShellAction::Key(event.key()));
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            shell.borrow_mut().frame(time);
            request_animation_frame(shell);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use nexus_defense::platform::FrameClock;
    use nexus_defense::renderer::LogRenderer;
    use nexus_defense::sim::{Game, GameEvent, SessionStatus, ShellAction};
    use nexus_defense::{Tuning, TuningError};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const TIME_LIMIT_MS: u64 = 120_000;

    /// Bot that always clicks the lowest virus and slows down with every hit.
    /// Returns the final score.
    pub fn run(tuning: Tuning) -> Result<u64, TuningError> {
        let mut game = Game::new(tuning, LogRenderer)?;
        game.handle(ShellAction::Open);
        game.handle(ShellAction::Start);

        let mut clock = FrameClock::new();
        let mut time = 0.0;
        let mut reaction_ms = 400.0;
        let mut next_click = reaction_ms;
        clock.tick(time);

        while game.session().status() == SessionStatus::Active && game.now_ms() < TIME_LIMIT_MS {
            time += FRAME_MS;
            game.advance(clock.tick(time));

            if time >= next_click {
                let lowest = game
                    .objects()
                    .iter()
                    .filter(|o| o.alive)
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|o| o.id);
                if let Some(id) = lowest {
                    game.handle(ShellAction::Activate(id));
                    reaction_ms *= 1.05;
                }
                next_click = time + reaction_ms;
            }

            for event in game.drain_events() {
                match event {
                    GameEvent::TierChanged { tier } => log::info!("Reached tier {}", tier),
                    GameEvent::Destroyed { score, .. } => log::debug!("Score {}", score),
                    _ => {}
                }
            }
        }

        let hud = game.hud();
        log::info!(
            "Autoplay stopped at {}ms: {} viruses destroyed",
            game.now_ms(),
            hud.destroyed
        );
        game.handle(ShellAction::Close);
        Ok(hud.final_score.unwrap_or(hud.score))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use nexus_defense::Tuning;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Nexus Defense (native) starting...");
    log::info!("Native mode runs a headless autoplay session - serve the wasm build for the real game");

    // Optional tuning JSON as the first argument
    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(&path)?)?,
        None => Tuning::default(),
    };

    let final_score = autoplay::run(tuning)?;
    println!("Final score: {final_score}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
