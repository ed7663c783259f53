//! Office Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        HtmlCanvasElement, HtmlElement, HtmlInputElement, HtmlTableRowElement,
        HtmlTableSectionElement, KeyboardEvent, MouseEvent,
    };

    use office_runner::audio::{AudioManager, SoundEffect};
    use office_runner::consts::*;
    use office_runner::leaderboard::{self, SaveStatus, ScoreSubmission, SubmissionTracker};
    use office_runner::renderer::{CanvasRenderer, render};
    use office_runner::session::{
        self, Focus, KeyAction, OVERLAY_IDS, Screen, ScreenEvent, dispatch_key,
    };
    use office_runner::sim::{GameEvent, GameState, TickInput, tick};
    use office_runner::{PlayerProfile, Settings, Tuning};

    struct Game {
        state: GameState,
        tuning: Tuning,
        settings: Settings,
        rng: Pcg32,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        profile: Option<PlayerProfile>,
        screen: Screen,
        submissions: SubmissionTracker,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, profile: Option<PlayerProfile>) -> Self {
            let tuning = Tuning::default();
            Self {
                state: GameState::new(&tuning),
                tuning,
                rng: Pcg32::seed_from_u64(seed),
                renderer: None,
                audio: AudioManager::new(&settings),
                settings,
                screen: Screen::initial(profile.as_ref()),
                profile,
                submissions: SubmissionTracker::new(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks, returning the events they produced
        fn update(&mut self, dt: f32) -> Vec<GameEvent> {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, &self.tuning, &mut self.rng);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.jump = false;
            }

            self.state.drain_events()
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                let commands = render(
                    &self.state,
                    &renderer.asset_status(),
                    &self.tuning,
                    &self.settings,
                );
                renderer.execute(&commands);
            }
        }

        fn show(&mut self, event: ScreenEvent) {
            match self.screen.next(event) {
                Some(next) => {
                    self.screen = next;
                    show_screen(next);
                }
                None => log::warn!("{:?} ignored on {:?} screen", event, self.screen),
            }
        }

        /// Start (or restart) a round
        fn start_round(&mut self, event: ScreenEvent) {
            self.show(event);
            self.state.restart(&self.tuning);
            self.accumulator = 0.0;
            self.input.jump = false;
            set_text("score", &session::hud_text(0));
            set_visible("savingStatus", false);
            self.audio.play(SoundEffect::Start);
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn html_element(id: &str) -> Option<HtmlElement> {
        document()?.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(id: &str, display: &str) {
        if let Some(el) = html_element(id) {
            let _ = el.style().set_property("display", display);
        }
    }

    fn set_visible(id: &str, visible: bool) {
        set_display(id, if visible { "block" } else { "none" });
    }

    fn show_screen(screen: Screen) {
        let active = screen.element_id();
        for id in OVERLAY_IDS {
            set_visible(id, Some(id) == active);
        }
    }

    fn input_value(id: &str) -> String {
        document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn focus() -> Focus {
        let on_input = document()
            .and_then(|d| d.active_element())
            .is_some_and(|el| el.tag_name().eq_ignore_ascii_case("INPUT"));
        if on_input { Focus::TextInput } else { Focus::Page }
    }

    fn show_profile(profile: &PlayerProfile) {
        set_text("displayName", &profile.name);
        set_text("displayPosition", &profile.role);
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Office Runner starting...");

        let document = document().ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        canvas.set_width(VIEWPORT_WIDTH as u32);
        canvas.set_height(VIEWPORT_HEIGHT as u32);

        let settings = Settings::load();
        let profile = PlayerProfile::load();
        if let Some(p) = &profile {
            show_profile(p);
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings, profile)));
        log::info!("Game initialized with seed: {}", seed);

        match CanvasRenderer::new(&canvas) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Canvas unavailable, nothing will be drawn: {:?}", e),
        }

        show_screen(game.borrow().screen);
        set_text("score", &session::hud_text(0));

        setup_keyboard(game.clone());
        setup_buttons(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Office Runner running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let action = dispatch_key(&event.key(), focus(), g.screen, g.state.phase);
            match action {
                KeyAction::PassThrough | KeyAction::Ignore => return,
                KeyAction::Consume => {}
                KeyAction::StartGame => g.start_round(ScreenEvent::Start),
                KeyAction::Jump => g.input.jump = true,
                KeyAction::ToggleIdle => {
                    g.input.idle_mode = !g.input.idle_mode;
                    log::info!("Idle mode: {}", g.input.idle_mode);
                }
                KeyAction::ToggleMute => {
                    let g = &mut *g;
                    g.settings.muted = !g.settings.muted;
                    g.settings.save();
                    g.audio.apply_settings(&g.settings);
                }
            }
            event.prevent_default();
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(id: &str, game: &Rc<RefCell<Game>>, handler: fn(&Rc<RefCell<Game>>)) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Button #{} missing", id);
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler(&game));
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click("registerButton", &game, register);
        on_click("startButton", &game, |game| {
            game.borrow_mut().start_round(ScreenEvent::Start)
        });
        on_click("restartButton", &game, |game| {
            game.borrow_mut().start_round(ScreenEvent::Restart)
        });
        on_click("leaderboardButton", &game, view_leaderboard);
        on_click("closeLeaderboardButton", &game, |game| {
            game.borrow_mut().show(ScreenEvent::CloseLeaderboard)
        });
    }

    fn register(game: &Rc<RefCell<Game>>) {
        match PlayerProfile::register(&input_value("playerName"), &input_value("playerPosition")) {
            Ok(profile) => {
                profile.save();
                show_profile(&profile);
                let mut g = game.borrow_mut();
                g.profile = Some(profile);
                g.show(ScreenEvent::Registered);
            }
            Err(e) => {
                log::info!("Registration blocked: {}", e);
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&e.to_string().to_uppercase());
                }
            }
        }
    }

    fn view_leaderboard(game: &Rc<RefCell<Game>>) {
        let url = {
            let mut g = game.borrow_mut();
            g.show(ScreenEvent::ViewLeaderboard);
            g.settings.leaderboard_url.clone()
        };
        set_text("leaderboardLoading", "⏳ LOADING...");
        set_visible("leaderboardLoading", true);
        set_display("leaderboardTable", "none");

        wasm_bindgen_futures::spawn_local(async move {
            match leaderboard::fetch(&url).await {
                Ok(entries) => fill_leaderboard(&entries),
                Err(e) => {
                    log::error!("Leaderboard fetch failed: {}", e);
                    set_text("leaderboardLoading", "❌ LOADING FAILED");
                }
            }
        });
    }

    fn fill_leaderboard(entries: &[leaderboard::LeaderboardEntry]) {
        let Some(body) = document()
            .and_then(|d| d.get_element_by_id("leaderboardBody"))
            .and_then(|el| el.dyn_into::<HtmlTableSectionElement>().ok())
        else {
            return;
        };
        body.set_inner_html("");

        for ranked in leaderboard::top_entries(entries) {
            let Some(row) = body
                .insert_row()
                .ok()
                .and_then(|r| r.dyn_into::<HtmlTableRowElement>().ok())
            else {
                continue;
            };
            let place = ranked.place_label();
            let score = ranked.entry.score.to_string();
            for text in [
                place.as_str(),
                ranked.entry.name.as_str(),
                ranked.entry.role.as_str(),
                score.as_str(),
            ] {
                if let Ok(cell) = row.insert_cell() {
                    cell.set_text_content(Some(text));
                }
            }
        }

        set_visible("leaderboardLoading", false);
        set_display("leaderboardTable", "table");
    }

    /// React to simulation events outside of the game borrow
    fn handle_events(game: &Rc<RefCell<Game>>, events: Vec<GameEvent>) {
        for event in events {
            if let Some(effect) = SoundEffect::for_event(&event) {
                game.borrow().audio.play(effect);
            }
            match event {
                GameEvent::Jumped => {}
                GameEvent::CoinCollected { score } => set_text("score", &session::hud_text(score)),
                GameEvent::GameOver { round, score } => on_game_over(game, round, score),
            }
        }
    }

    fn on_game_over(game: &Rc<RefCell<Game>>, round: u32, score: u64) {
        let submission = {
            let mut g = game.borrow_mut();
            g.show(ScreenEvent::RoundEnded);
            set_text("finalScore", &score.to_string());
            set_text("scoreComment", session::score_comment(score));

            let Some(profile) = g.profile.clone() else {
                log::warn!("No profile, score {} not submitted", score);
                return;
            };
            if !g.submissions.begin(round) {
                return;
            }
            (g.settings.leaderboard_url.clone(), ScoreSubmission::new(&profile, score))
        };

        set_text("savingStatus", SaveStatus::Saving.label());
        set_visible("savingStatus", true);

        let game = game.clone();
        let (url, submission) = submission;
        wasm_bindgen_futures::spawn_local(async move {
            let status = match leaderboard::submit(&url, &submission).await {
                Ok(()) => SaveStatus::Saved,
                Err(e) => {
                    log::error!("Score submission failed: {}", e);
                    SaveStatus::Failed
                }
            };
            if game.borrow().submissions.is_current(round) {
                set_text("savingStatus", status.label());
            } else {
                log::info!("Round {} submission finished after a newer round", round);
            }
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let events = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let events = g.update(dt);
            g.render();
            events
        };
        handle_events(&game, events);

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Headless demo: the autopilot plays one round and the result is logged.
/// An optional first argument points at a tuning JSON file.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use office_runner::Tuning;
    use office_runner::renderer::{AssetStatus, render};
    use office_runner::session::score_comment;
    use office_runner::settings::Settings;
    use office_runner::sim::{GameEvent, GameState, TickInput, tick};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Office Runner (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("Could not load tuning from {}: {}; using defaults", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    const DEMO_TICKS: u64 = 60 * 120;
    let seed = office_runner::platform::now_ms() as u64;
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut state = GameState::new(&tuning);
    state.restart(&tuning);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut jumps = 0;
    for _ in 0..DEMO_TICKS {
        tick(&mut state, &input, &tuning, &mut rng);
        for event in state.drain_events() {
            match event {
                GameEvent::Jumped => jumps += 1,
                GameEvent::CoinCollected { score } => log::debug!("Coin! score {}", score),
                GameEvent::GameOver { .. } => {}
            }
        }
        if !state.is_running() {
            break;
        }
    }

    let commands = render(&state, &AssetStatus::default(), &tuning, &Settings::default());
    log::debug!("Final frame has {} draw commands", commands.len());

    println!(
        "seed {}: {} frames, {} jumps, score {} at speed {:.2} ({:?})",
        seed, state.frame, jumps, state.score, state.scroll_speed, state.phase
    );
    println!("{}", score_comment(state.score));
}
