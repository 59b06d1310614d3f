//! Star Shooter entry point
//!
//! On the web this wires browser input, LocalStorage and the Telegram host
//! to a [`Session`] and hands a snapshot to the page's drawing code every
//! animation frame. Natively it runs a short autopiloted demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use star_shooter::consts::*;
    use star_shooter::persistence::{MemoryStore, WebStorage};
    use star_shooter::platform::TelegramChannel;
    use star_shooter::{Session, Tuning};

    // Drawing lives in the page; it registers `window.starShooterPresent`
    #[wasm_bindgen(inline_js = "
        export function present(json) {
            if (typeof window.starShooterPresent === 'function') {
                window.starShooterPresent(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present(json: &str);
    }

    struct Game {
        session: Session,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        /// Convert client coordinates to playfield coordinates
        fn to_playfield(&self, client_x: f32, client_y: f32) -> (f32, f32) {
            let rect = self.canvas.get_bounding_client_rect();
            let sx = if rect.width() > 0.0 {
                PLAYFIELD_WIDTH / rect.width() as f32
            } else {
                1.0
            };
            let sy = if rect.height() > 0.0 {
                PLAYFIELD_HEIGHT / rect.height() as f32
            } else {
                1.0
            };
            (
                (client_x - rect.left() as f32) * sx,
                (client_y - rect.top() as f32) * sy,
            )
        }

        fn frame(&mut self) {
            self.session.frame();
            match serde_json::to_string(&self.session.snapshot()) {
                Ok(json) => present(&json),
                Err(e) => log::warn!("Snapshot encode failed: {}", e),
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .ok_or("no #game canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let style = canvas.style();
        style.set_property("width", &format!("{}px", PLAYFIELD_WIDTH))?;
        style.set_property("height", &format!("{}px", PLAYFIELD_HEIGHT))?;
        canvas.set_width((PLAYFIELD_WIDTH as f64 * dpr) as u32);
        canvas.set_height((PLAYFIELD_HEIGHT as f64 * dpr) as u32);

        TelegramChannel::init();

        let store: Box<dyn star_shooter::persistence::KeyValueStore> = match WebStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; progress will not be saved", e);
                Box::new(MemoryStore::new())
            }
        };
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, Tuning::default(), store, Box::new(TelegramChannel));

        let game = Rc::new(RefCell::new(Game { session, canvas: canvas.clone() }));

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let (x, y) = g.to_playfield(event.client_x() as f32, event.client_y() as f32);
                if let Some(action) = g.session.tap(x, y) {
                    log::debug!("Tap -> {:?}", action);
                }
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let (x, _) = g.to_playfield(event.client_x() as f32, event.client_y() as f32);
                g.session.pointer_moved(x);
            });
            canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let (x, _) =
                        g.to_playfield(touch.client_x() as f32, touch.client_y() as f32);
                    g.session.pointer_moved(x);
                }
            });
            canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Buy-with-stars button, if the page has one
        if let Some(btn) = document.get_element_by_id("buy-hp-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Err(e) = game.borrow_mut().session.request_star_purchase() {
                    log::warn!("Star purchase failed: {}", e);
                }
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        request_animation_frame(game);
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use star_shooter::consts::PLAYFIELD_WIDTH;
    use star_shooter::persistence::MemoryStore;
    use star_shooter::platform::LogChannel;
    use star_shooter::sim::GameEvent;
    use star_shooter::{Session, Tuning};

    env_logger::init();
    log::info!("Star Shooter (native) starting headless demo...");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut session = Session::new(
        seed,
        Tuning::default(),
        Box::new(MemoryStore::new()),
        Box::new(LogChannel),
    );
    session.start_game();

    // Autopilot: chase the lowest enemy (or the boss)
    const MAX_TICKS: u32 = 60 * 120;
    let mut ticks = 0;
    while ticks < MAX_TICKS && !session.is_game_over() {
        let state = session.state();
        let target = state
            .boss
            .as_ref()
            .or_else(|| {
                state
                    .enemies
                    .iter()
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            })
            .map(|e| e.center().x)
            .unwrap_or(PLAYFIELD_WIDTH / 2.0);
        session.pointer_moved(target);

        for event in session.frame() {
            if let GameEvent::BossSpawned { hp } = event {
                log::info!("Tick {}: boss with {} hp", ticks, hp);
            }
        }
        ticks += 1;
    }

    let snapshot = session.snapshot();
    println!(
        "Demo finished after {} ticks: score {}, level {}, saved coins {}",
        ticks, snapshot.score, snapshot.level, snapshot.saved_coins
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
