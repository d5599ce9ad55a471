use dialoguer::Select;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::config::Config;
use crate::core::{GameEngine, UserProfile};
use crate::i18n::{TranslationLoader, Translator};
use crate::render::{Canvas, TerminalCanvas};
use crate::ui::{drain_until_closed, spawn_key_reader, Display, FrameDriver, HostInput, ListenerHandle, SessionOutcome, ThemeManager};
use crate::utils::{GameError, GameResult, LaunchTracker};
use tracing::{info, warn, error};

const TEXT_WIDTH: usize = 60;
const CONTROLS_HINT: &str = "← →  q";

pub struct GameInterface {
    translator: Translator,
    tracker: Option<Arc<LaunchTracker>>,
    display: Display,
    config: Config,
    profile: UserProfile,
    seed: Option<u64>,
}

impl GameInterface {
    pub async fn new(config: Config, profile: UserProfile, seed: Option<u64>) -> GameResult<Self> {
        info!("Initializing game interface");

        config.ensure_directories()?;

        let mut display = Display::new(ThemeManager::new(), TEXT_WIDTH)
            .map_err(|e| GameError::interface(format!("Failed to create display: {}", e)))?;

        if !display.set_theme(&config.display.theme) {
            warn!("Unknown theme '{}', using default", config.display.theme);
        }

        let mut translator = Translator::new(TranslationLoader::new(&config.i18n.translations_dir));
        translator
            .set_language(profile.language_or(&config.i18n.default_language))
            .await;

        let tracker = (config.analytics.enabled && profile.is_identified())
            .then(|| Arc::new(LaunchTracker::new(config.registry_path())));

        Ok(Self {
            translator,
            tracker,
            display,
            config,
            profile,
            seed,
        })
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn tracks_launches(&self) -> bool {
        self.tracker.is_some()
    }

    pub async fn run(&mut self) -> GameResult<()> {
        info!("Starting game interface for {}", self.profile.display_name());

        if let Some(tracker) = &self.tracker {
            tracker.clone().track_in_background(self.profile.clone());
        }

        loop {
            match self.show_main_menu().await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    error!("Main menu error: {}", e);
                    self.display.show_cursor().ok();
                    self.display.show_error(&e.to_string()).ok();
                    self.display.wait_for_key().ok();
                }
            }
        }

        self.display.clear_screen().ok();
        Ok(())
    }

    async fn show_main_menu(&mut self) -> GameResult<bool> {
        self.display.clear_screen().ok();
        self.display.show_title(&self.translator.text("game_title"))?;
        self.display.show_message(
            &self
                .translator
                .get_text("welcome_message", &[("username", self.profile.display_name())]),
            "info",
        )?;
        println!();

        let choices = vec![
            self.translator.text("start_game_button"),
            self.translator.text("exit_game"),
        ];

        let selection = Select::new()
            .items(&choices)
            .default(0)
            .interact()
            .map_err(|e| GameError::interface(format!("Menu selection error: {}", e)))?;

        match selection {
            0 => {
                self.show_instructions()?;
                self.play_until_done().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn show_instructions(&self) -> GameResult<()> {
        self.display.clear_screen().ok();
        self.display.show_title(&self.translator.text("game_title"))?;
        self.display.show_message(&self.translator.text("game_instructions"), "info")?;
        println!();
        self.display.show_message(&self.translator.text("press_any_key"), "hint")?;
        self.display.wait_for_key()?;
        Ok(())
    }

    async fn play_until_done(&mut self) -> GameResult<()> {
        loop {
            match self.play_session().await? {
                SessionOutcome::GameOver(score) => {
                    if !self.ask_play_again(score)? {
                        break;
                    }
                }
                SessionOutcome::Quit | SessionOutcome::InputClosed => break,
            }
        }
        Ok(())
    }

    /// One run on a canvas sized to the current terminal.
    async fn play_session(&mut self) -> GameResult<SessionOutcome> {
        let (rows, cols) = self.display.term().size();
        let canvas = TerminalCanvas::fit_to_terminal(rows, cols, &self.config.display)?;

        let reported = Rc::new(Cell::new(None));
        let sink = reported.clone();
        let mut engine = GameEngine::new(canvas, self.config.engine_settings(), move |score| {
            sink.set(Some(score))
        })?;
        if let Some(seed) = self.seed {
            engine = engine.with_seed(seed);
        }

        let (sender, mut inputs) = unbounded_channel();
        let listener = ListenerHandle::new();
        spawn_key_reader(self.display.term().clone(), sender, listener.clone());

        self.display.clear_screen().ok();
        self.display.hide_cursor().ok();

        let mut driver = FrameDriver::new(
            Duration::from_millis(self.config.frame_interval_ms()),
            Duration::from_millis(self.config.display.key_hold_ms),
        );

        engine.start();
        let translator = &self.translator;
        let display = &self.display;
        let outcome = driver
            .run(&mut engine, &mut inputs, |engine| {
                let score_text = translator.get_text("current_score", &[("score", &engine.score().to_string())]);
                let footer = display.score_footer(&score_text, CONTROLS_HINT);
                engine.canvas().present(display.term(), &footer)?;
                Ok(())
            })
            .await;

        listener.shutdown();
        self.display.show_cursor().ok();
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Session aborted: {}", e);
                println!();
                self.display.show_message(&self.translator.text("press_any_key"), "hint")?;
                drain_until_closed(&mut inputs).await;
                return Err(e);
            }
        };

        let stats = engine.statistics();
        info!(
            "Session ended: {:?}, score {}, {} frames in {}",
            outcome,
            stats.score,
            stats.frames,
            stats.get_duration_formatted()
        );

        if matches!(self.config.logging.level.as_str(), "debug" | "trace") {
            match export_event_history(&engine, &self.config.paths.logs_dir).await {
                Ok(path) => info!("Event history written to {}", path.display()),
                Err(e) => warn!("Failed to export event history: {}", e),
            }
        }

        if let Some(score) = reported.get() {
            self.show_game_over(score, &mut inputs).await?;
        }

        Ok(outcome)
    }

    async fn show_game_over(&self, score: u32, inputs: &mut UnboundedReceiver<HostInput>) -> GameResult<()> {
        let score = score.to_string();
        println!();
        self.display.show_message(&self.translator.text("game_over"), "game_over")?;
        self.display.show_message(
            &self.translator.get_text("final_score", &[("score", &score)]),
            "score",
        )?;
        self.display.show_message(&self.translator.text("press_any_key"), "hint")?;

        // the reader forwards one more key after shutdown, then closes the channel
        drain_until_closed(inputs).await;
        Ok(())
    }

    fn ask_play_again(&self, score: u32) -> GameResult<bool> {
        let choices = vec![
            self.translator.text("play_again"),
            self.translator.text("back_to_menu"),
        ];

        let selection = Select::new()
            .with_prompt(self.translator.get_text("final_score", &[("score", &score.to_string())]))
            .items(&choices)
            .default(0)
            .interact()
            .map_err(|e| GameError::interface(format!("Game over selection error: {}", e)))?;

        Ok(selection == 0)
    }
}

/// Writes the run's event history to `<logs_dir>/events-<run_id>.json`.
pub async fn export_event_history<C: Canvas>(engine: &GameEngine<C>, logs_dir: &Path) -> GameResult<PathBuf> {
    let path = logs_dir.join(format!("events-{}.json", engine.statistics().run_id));
    tokio::fs::write(&path, engine.export_events()?).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineSettings;
    use crate::core::GameEvent;
    use crate::render::RecordingCanvas;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.paths.data_dir = dir.join("data");
        config.paths.logs_dir = dir.join("logs");
        config
    }

    #[tokio::test]
    async fn test_interface_uses_profile_language() {
        let temp_dir = tempdir().unwrap();
        let config = config_in(temp_dir.path());
        let profile = UserProfile::new(12).with_language("ru-RU");

        let interface = GameInterface::new(config, profile, Some(7)).await.unwrap();

        assert_eq!(interface.translator().current_language(), "ru");
        assert_eq!(interface.translator().text("play_again"), "Играть снова");
        assert!(interface.tracks_launches());
        assert!(temp_dir.path().join("data").exists());
    }

    #[tokio::test]
    async fn test_guests_and_disabled_analytics_are_not_tracked() {
        let temp_dir = tempdir().unwrap();

        let guest = GameInterface::new(config_in(temp_dir.path()), UserProfile::guest(), None)
            .await
            .unwrap();
        assert!(!guest.tracks_launches());
        assert_eq!(guest.translator().current_language(), "en");

        let mut config = config_in(temp_dir.path());
        config.analytics.enabled = false;
        let opted_out = GameInterface::new(config, UserProfile::new(1), None).await.unwrap();
        assert!(!opted_out.tracks_launches());
    }

    #[tokio::test]
    async fn test_event_history_export_lands_in_logs_dir() {
        let temp_dir = tempdir().unwrap();
        let mut engine = GameEngine::new(RecordingCanvas::new(600.0, 800.0), EngineSettings::default(), |_| {}).unwrap();
        engine.start();
        engine.stop();

        let path = export_event_history(&engine, temp_dir.path()).await.unwrap();

        assert_eq!(path.parent(), Some(temp_dir.path()));
        let events: Vec<GameEvent> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(events.len(), engine.event_history().len());
    }
}
