use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::config::EngineSettings;
use crate::core::entities::{self, Sleigh, Snowflake};
use crate::core::events::{CompositeEventHandler, EventLogger, GameEvent, GameEventHandler, GameEventType, TracingEventHandler};
use crate::core::game_state::{GamePhase, GameState, RunStatistics};
use crate::core::input::{Direction, InputEvent, InputState};
use crate::render::{scene, Canvas};
use crate::utils::{GameError, GameResult};
use tracing::{info, debug, trace};

/// Receives the final score when a collision ends a run.
pub type GameOverCallback = Box<dyn FnMut(u32)>;

/// Simulation and render loop for one drawing surface.
///
/// The engine never schedules itself: the host calls [`GameEngine::advance_frame`]
/// at its refresh cadence for as long as it returns `true`.
pub struct GameEngine<C: Canvas> {
    canvas: C,
    settings: EngineSettings,
    sleigh: Sleigh,
    snowflakes: Vec<Snowflake>,
    input: InputState,
    input_attached: bool,
    state: GameState,
    rng: StdRng,
    on_game_over: GameOverCallback,
    event_log: EventLogger,
    observers: CompositeEventHandler,
}

impl<C: Canvas> GameEngine<C> {
    /// Fails when the surface cannot host the sleigh.
    pub fn new<F>(canvas: C, settings: EngineSettings, on_game_over: F) -> GameResult<Self>
    where
        F: FnMut(u32) + 'static,
    {
        let (width, height) = (canvas.width(), canvas.height());
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(GameError::canvas(format!("Invalid surface size {}x{}", width, height)));
        }
        if width < settings.sleigh.width || height <= settings.sleigh.bottom_offset {
            return Err(GameError::canvas(format!(
                "Surface {}x{} is too small for a {}x{} sleigh",
                width, height, settings.sleigh.width, settings.sleigh.height
            )));
        }

        let sleigh = Sleigh::new(&settings.sleigh, width, height);
        let mut observers = CompositeEventHandler::new();
        observers.add_handler(TracingEventHandler);

        let mut engine = Self {
            canvas,
            settings,
            sleigh,
            snowflakes: Vec::new(),
            input: InputState::default(),
            input_attached: false,
            state: GameState::new(),
            rng: StdRng::from_entropy(),
            on_game_over: Box::new(on_game_over),
            event_log: EventLogger::default(),
            observers,
        };
        engine.attach_input();

        debug!("Game engine created for a {}x{} surface", width, height);
        Ok(engine)
    }

    /// Replaces the spawn RNG with a seeded one for reproducible snowfall.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Begins a fresh run. Calling it while running simply resets the run.
    pub fn start(&mut self) {
        self.state.begin_run();
        self.snowflakes.clear();
        self.sleigh.reset(self.canvas.width());
        self.input.clear();
        self.attach_input();

        info!("Run started ({})", self.state.run_id);
        self.emit_event(GameEvent::run_started(
            self.state.run_id,
            self.canvas.width(),
            self.canvas.height(),
        ));
    }

    /// Ends the run without invoking the game-over callback. Score and
    /// snowflakes stay inspectable.
    pub fn stop(&mut self) {
        if self.state.is_running() {
            self.state.end_run(GamePhase::Stopped);
            info!("Run stopped with score {}", self.state.score);
            self.emit_event(GameEvent::run_stopped(self.state.run_id, self.state.score));
        }
        self.detach_input("stop");
    }

    /// Runs one frame: steer, spawn, fall/score/collide, scroll, draw.
    /// Returns whether another frame should be scheduled.
    pub fn advance_frame(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state.frames += 1;

        let width = self.canvas.width();
        self.sleigh.steer(&self.input, width);

        if entities::should_spawn(&mut self.rng, self.settings.game.snowflake_spawn_rate) {
            let flake = entities::spawn_snowflake(&mut self.rng, &self.settings.game, width);
            trace!("Spawned snowflake at x={:.1}", flake.x);
            self.snowflakes.push(flake);
        }

        self.update_snowflakes();

        self.state
            .scroll_background(self.settings.game.background_speed, self.canvas.height());
        self.render();

        self.state.is_running()
    }

    fn update_snowflakes(&mut self) {
        let height = self.canvas.height();

        // Reverse walk so swap_remove only pulls in already-visited flakes.
        let mut i = self.snowflakes.len();
        while i > 0 {
            i -= 1;
            let flake = &mut self.snowflakes[i];
            flake.fall();

            if flake.is_below(height) {
                self.snowflakes.swap_remove(i);
                self.state.add_point();
                continue;
            }

            if self.sleigh.collides_with(&self.snowflakes[i]) {
                self.game_over();
                return;
            }
        }
    }

    fn game_over(&mut self) {
        let score = self.state.score;
        self.state.end_run(GamePhase::GameOver);
        self.detach_input("game_over");

        info!("Game over with score {} after {} frames", score, self.state.frames);
        self.emit_event(GameEvent::game_over(self.state.run_id, score, self.state.frames));

        (self.on_game_over)(score);
    }

    fn render(&mut self) {
        self.canvas.clear();
        scene::draw_background(&mut self.canvas, self.state.background_offset);
        scene::draw_sleigh(&mut self.canvas, &self.sleigh);
        scene::draw_snowflakes(&mut self.canvas, &self.snowflakes);
    }

    /// Applies a key transition. Returns `false` when input is detached.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if !self.input_attached {
            trace!("Ignoring {:?}: input detached", event);
            return false;
        }
        self.input.apply(event);
        true
    }

    pub fn key_down(&mut self, direction: Direction) -> bool {
        self.handle_input(InputEvent::Pressed(direction))
    }

    pub fn key_up(&mut self, direction: Direction) -> bool {
        self.handle_input(InputEvent::Released(direction))
    }

    fn attach_input(&mut self) {
        if !self.input_attached {
            self.input_attached = true;
            self.emit_event(GameEvent::input_attached());
        }
    }

    fn detach_input(&mut self, reason: &str) {
        if self.input_attached {
            self.input_attached = false;
            self.emit_event(GameEvent::input_detached(reason));
        }
    }

    /// Places a snowflake directly, bypassing the spawn roll.
    pub fn push_snowflake(&mut self, snowflake: Snowflake) {
        self.snowflakes.push(snowflake);
    }

    fn emit_event(&mut self, event: GameEvent) {
        self.observers.handle_event(&event);
        self.event_log.handle_event(&event);
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn input_attached(&self) -> bool {
        self.input_attached
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn sleigh(&self) -> &Sleigh {
        &self.sleigh
    }

    pub fn snowflakes(&self) -> &[Snowflake] {
        &self.snowflakes
    }

    pub fn background_offset(&self) -> f64 {
        self.state.background_offset
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn statistics(&self) -> RunStatistics {
        self.state.get_statistics()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn event_history(&self) -> &[GameEvent] {
        self.event_log.get_events()
    }

    pub fn events_of(&self, event_type: &GameEventType) -> Vec<&GameEvent> {
        self.event_log.get_events_by_type(event_type)
    }

    /// The recorded event history as pretty-printed JSON.
    pub fn export_events(&self) -> GameResult<String> {
        Ok(self.event_log.export_events()?)
    }
}
