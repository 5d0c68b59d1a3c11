//! Puzzle Rally entry point
//!
//! Web: wires the session to the page and forwards clicks. Native: walks one
//! puzzle through every step and reports how much of it each mode reveals.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::Clamped;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement,
        ImageData, MouseEvent,
    };

    use puzzle_rally::audio::{AudioManager, SoundEffect};
    use puzzle_rally::persistence::LocalStore;
    use puzzle_rally::platform::SystemClock;
    use puzzle_rally::renderer::{Bitmap, Frame, ImageSlot, LoadToken, RenderOutcome};
    use puzzle_rally::steps::ALL_STEPS;
    use puzzle_rally::{ImageError, PuzzleCatalog, RevealMode, Session, SessionEvent};

    /// Canvas edge (device pixels) when layout reports nothing
    const FALLBACK_SIZE: u32 = 512;

    /// A button to put in one of the page's containers
    struct ButtonSpec {
        value: String,
        text: String,
        class: &'static str,
    }

    /// Everything the page callbacks share
    struct App {
        session: Session,
        canvas: HtmlCanvasElement,
        frame: Frame,
        ctx: CanvasRenderingContext2d,
        document: Document,
        audio: AudioManager,
    }

    impl App {
        /// Match the canvas backing store to its layout size and redraw
        fn resize(&mut self, size: u32) {
            if size == self.frame.size() {
                return;
            }
            log::debug!("Canvas resized to {}px", size);
            self.canvas.set_width(size);
            self.canvas.set_height(size);
            self.frame.resize(size);
            self.draw();
        }

        /// Render the session and copy the pixels onto the canvas
        fn draw(&mut self) {
            if self.session.render(&mut self.frame) == RenderOutcome::Skipped {
                return;
            }
            let size = self.frame.size();
            match ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(self.frame.as_bytes()),
                size,
                size,
            ) {
                Ok(data) => {
                    if let Err(e) = self.ctx.put_image_data(&data, 0.0, 0.0) {
                        log::warn!("putImageData failed: {:?}", e);
                    }
                }
                Err(e) => log::warn!("Failed to wrap frame: {:?}", e),
            }
        }

        fn handle_events(&mut self) {
            for event in self.session.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                match event {
                    SessionEvent::StepCompleted { step } => {
                        let message = self
                            .session
                            .active_steps()
                            .get(step)
                            .map(|s| s.goal_message)
                            .unwrap_or_default();
                        self.set_text("message", message);
                    }
                    SessionEvent::Solved { .. } => {
                        let message = format!("🎉 {} 🎉", self.session.puzzle().name);
                        self.set_text("message", &message);
                        self.set_hidden("celebration", false);
                    }
                    SessionEvent::StampAwarded { streak, .. } => {
                        log::info!("Stamp! {} day streak", streak);
                    }
                    SessionEvent::ProgressReset => {
                        self.set_text("message", "");
                        self.set_hidden("celebration", true);
                    }
                }
            }
        }

        /// Refresh everything outside the canvas
        fn update_ui(&self) {
            let current = self.session.current_step();
            let next = current + 1;
            let steps = self
                .session
                .active_steps()
                .iter()
                .enumerate()
                .map(|(i, step)| {
                    let i = i as i32;
                    ButtonSpec {
                        value: i.to_string(),
                        text: format!("{} {}", step.emoji, step.label),
                        class: if i <= current {
                            "step-btn done"
                        } else if i == next {
                            "step-btn next"
                        } else {
                            "step-btn locked"
                        },
                    }
                })
                .collect();
            self.fill_buttons("steps", "data-step", steps);

            let modes = RevealMode::ALL
                .iter()
                .map(|mode| ButtonSpec {
                    value: mode.as_str().to_string(),
                    text: mode.as_str().to_string(),
                    class: selected_class(*mode == self.session.reveal_mode()),
                })
                .collect();
            self.fill_buttons("reveal-modes", "data-mode", modes);

            let puzzles = self
                .session
                .catalog()
                .iter()
                .map(|p| ButtonSpec {
                    value: p.id.clone(),
                    text: p.name.clone(),
                    class: selected_class(p.id == self.session.puzzle().id),
                })
                .collect();
            self.fill_buttons("puzzle-picker", "data-puzzle", puzzles);

            let config = ALL_STEPS
                .iter()
                .map(|step| ButtonSpec {
                    value: step.id.to_string(),
                    text: format!("{} {}", step.emoji, step.label),
                    class: selected_class(self.session.is_step_active(step.id)),
                })
                .collect();
            self.fill_buttons("step-config", "data-step-id", config);

            let order = self
                .session
                .active_steps()
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, step)| ButtonSpec {
                    value: i.to_string(),
                    text: format!("⬆ {}", step.label),
                    class: "",
                })
                .collect();
            self.fill_buttons("step-order", "data-move-up", order);

            self.set_text("hint-text", self.session.current_hint().unwrap_or_default());
            self.set_text("streak", &self.session.streak().to_string());
            self.set_text("day-mode-btn", self.session.day_mode().as_str());
            let sound = if self.session.settings().sound_enabled {
                "🔊"
            } else {
                "🔇"
            };
            self.set_text("sound-btn", sound);
        }

        fn fill_buttons(&self, container: &str, attr: &str, buttons: Vec<ButtonSpec>) {
            let Some(parent) = self.document.get_element_by_id(container) else {
                return;
            };
            parent.set_inner_html("");
            for spec in buttons {
                let Ok(btn) = self.document.create_element("button") else {
                    continue;
                };
                let _ = btn.set_attribute(attr, &spec.value);
                btn.set_class_name(spec.class);
                btn.set_text_content(Some(&spec.text));
                let _ = parent.append_child(&btn);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }
    }

    fn selected_class(selected: bool) -> &'static str {
        if selected { "selected" } else { "" }
    }

    fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
        canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Puzzle Rally starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let size = canvas_size(&window, &canvas);
        canvas.set_width(size);
        canvas.set_height(size);
        let ctx = context_2d(&canvas).expect("no 2d context");

        let session = Session::new(
            Box::new(LocalStore::open()),
            Box::new(SystemClock),
            PuzzleCatalog::builtin(),
        );
        let mut audio = AudioManager::new();
        audio.set_enabled(session.settings().sound_enabled);

        let app = Rc::new(RefCell::new(App {
            session,
            canvas,
            frame: Frame::new(size),
            ctx,
            document: document.clone(),
            audio,
        }));

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_click_handlers(&document, app.clone());
        setup_date_refresh(&document, app.clone());
        setup_resize(&window, app.clone());

        refresh(&app);
        log::info!("Puzzle Rally running!");
    }

    /// Square canvas edge at device resolution
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> u32 {
        let dpr = window.device_pixel_ratio();
        match (canvas.client_width() as f64 * dpr) as u32 {
            0 => FALLBACK_SIZE,
            n => n,
        }
    }

    /// Re-sync the page after any state change
    fn refresh(app: &Rc<RefCell<App>>) {
        let needs_image = matches!(app.borrow().session.image(), ImageSlot::Empty);
        if needs_image {
            start_image_load(app);
        }
        let mut a = app.borrow_mut();
        a.handle_events();
        a.update_ui();
        a.draw();
    }

    /// Value of `attr` on the clicked element or its closest ancestor
    fn clicked_value(event: &MouseEvent, attr: &str) -> Option<String> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let owner = target.closest(&format!("[{}]", attr)).ok()??;
        owner.get_attribute(attr)
    }

    /// One delegated listener per container
    fn on_click(
        document: &Document,
        container: &str,
        attr: &'static str,
        app: Rc<RefCell<App>>,
        action: fn(&mut App, &str),
    ) {
        let Some(el) = document.get_element_by_id(container) else {
            log::warn!("Missing #{}", container);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(value) = clicked_value(&event, attr) else {
                return;
            };
            action(&mut app.borrow_mut(), &value);
            refresh(&app);
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_click_handlers(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "steps", "data-step", app.clone(), |a, v| {
            if let Ok(step) = v.parse() {
                a.session.complete_step(step);
            }
        });
        on_click(document, "reveal-modes", "data-mode", app.clone(), |a, v| {
            if let Some(mode) = RevealMode::from_str(v) {
                a.session.set_reveal_mode(mode);
            }
        });
        on_click(document, "puzzle-picker", "data-puzzle", app.clone(), |a, v| {
            a.session.switch_puzzle(v);
        });
        on_click(document, "step-config", "data-step-id", app.clone(), |a, v| {
            let change = a.session.toggle_step(v);
            if !change.is_applied() {
                log::info!("Toggle '{}' rejected: {:?}", v, change);
            }
        });
        on_click(document, "step-order", "data-move-up", app.clone(), |a, v| {
            if let Ok(from) = v.parse::<usize>() {
                a.session.reorder_steps(from, from.saturating_sub(1));
            }
        });
        on_click(document, "controls", "data-action", app, |a, v| match v {
            "day-mode" => {
                a.session.toggle_day_mode();
            }
            "sound" => {
                let enabled = !a.session.settings().sound_enabled;
                a.session.set_sound_enabled(enabled);
                a.audio.set_enabled(enabled);
            }
            "reset" => a.session.reset(),
            other => log::warn!("Unknown action '{}'", other),
        });
    }

    /// The page may stay open past midnight; check when it comes back into view
    fn setup_date_refresh(document: &Document, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let changed = app.borrow_mut().session.refresh_date();
            if changed {
                refresh(&app);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Layout width and device pixel ratio both change on window resize
    fn setup_resize(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let win = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let size = canvas_size(&win, &a.canvas);
            a.resize(size);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Fetch and decode the current puzzle's picture in the background
    fn start_image_load(app: &Rc<RefCell<App>>) {
        let (token, src) = app.borrow_mut().session.begin_image_load();
        let app = app.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_bitmap(&src).await;
            finish_image_load(&app, token, result);
        });
    }

    fn finish_image_load(app: &Rc<RefCell<App>>, token: LoadToken, result: Result<Bitmap, ImageError>) {
        let mut a = app.borrow_mut();
        if a.session.finish_image_load(token, result) {
            a.draw();
        }
    }

    async fn fetch_bitmap(src: &str) -> Result<Bitmap, ImageError> {
        let failed = || ImageError::LoadFailed(src.to_string());

        let img = HtmlImageElement::new().map_err(|_| failed())?;
        img.set_cross_origin(Some("anonymous"));
        img.set_src(src);
        JsFuture::from(img.decode()).await.map_err(|_| failed())?;

        let (width, height) = (img.natural_width(), img.natural_height());
        if width == 0 || height == 0 {
            return Err(ImageError::Empty);
        }

        // Read the pixels back through a scratch canvas
        let scratch: HtmlCanvasElement = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("canvas").ok())
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(failed)?;
        scratch.set_width(width);
        scratch.set_height(height);
        let ctx = context_2d(&scratch).ok_or_else(failed)?;
        ctx.draw_image_with_html_image_element(&img, 0.0, 0.0)
            .map_err(|_| failed())?;
        let data = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(|_| failed())?;

        Bitmap::from_rgba(width, height, &data.data())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use puzzle_rally::persistence::MemoryStore;
    use puzzle_rally::platform::SystemClock;
    use puzzle_rally::renderer::{Bitmap, Frame, Rgba};
    use puzzle_rally::{PuzzleCatalog, RevealMode, Session};

    env_logger::init();
    log::info!("Puzzle Rally (native) starting...");
    log::info!("The game itself runs in the browser - build for wasm32 and serve with trunk");

    const DEMO_SIZE: u32 = 128;

    let mut session = Session::new(
        Box::new(MemoryStore::new()),
        Box::new(SystemClock),
        PuzzleCatalog::builtin(),
    );
    if let Some(id) = std::env::args().nth(1) {
        if !session.switch_puzzle(&id) && session.puzzle().id != id {
            log::warn!("Unknown puzzle '{}', using today's", id);
        }
    }

    println!("Puzzle: {} ({})", session.puzzle().name, session.puzzle().id);
    println!(
        "Steps:  {}",
        session
            .active_steps()
            .iter()
            .map(|s| s.id)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Tiles:    {:?}", session.plan().tiles);
    println!("Percents: {:?}", session.plan().percents);
    println!("Order:    {:?}", session.tile_order());

    // Stand-in picture: opaque and distinct from the dark placeholder
    let image = Bitmap::from_fn(DEMO_SIZE, DEMO_SIZE, |x, y| {
        Rgba::new((x * 2) as u8, 255 - (y * 2) as u8, 128, 255)
    });
    let shown = |frame: &Frame| {
        let total = (DEMO_SIZE * DEMO_SIZE) as usize;
        let matching = (0..DEMO_SIZE)
            .flat_map(|y| (0..DEMO_SIZE).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.get(x, y) == image.get(x, y))
            .count();
        matching as f32 / total as f32 * 100.0
    };

    for mode in RevealMode::ALL {
        session.set_reveal_mode(mode);
        let (token, _) = session.begin_image_load();
        session.finish_image_load(token, Ok(image.clone()));

        let mut frame = Frame::new(DEMO_SIZE);
        println!("\n[{}]", mode.as_str());
        session.render(&mut frame);
        println!("  before start: {:5.1}% exact", shown(&frame));
        for step in 0..session.step_count() {
            session.complete_step(step);
            session.render(&mut frame);
            println!(
                "  after step {}: {:5.1}% exact  (hint: {})",
                step,
                shown(&frame),
                session.current_hint().unwrap_or("-")
            );
        }
    }

    for event in session.drain_events() {
        log::debug!("{:?}", event);
    }
    println!("\nStamps earned today: {}", session.stamps().on_date(session.today()).count());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
