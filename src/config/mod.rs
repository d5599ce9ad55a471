use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::utils::{GameError, GameResult};
use tracing::debug;

/// Prefix for environment overrides, e.g. `SLEIGH_RUSH__GAME__SNOWFLAKE_SPAWN_RATE=80`.
pub const ENV_PREFIX: &str = "SLEIGH_RUSH";

/// Above this the frame interval would round down to zero milliseconds.
pub const MAX_FRAME_RATE: u32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub sleigh: SleighConfig,
    pub display: DisplayConfig,
    pub i18n: I18nConfig,
    pub paths: PathConfig,
    pub logging: LoggingConfig,
    pub analytics: AnalyticsConfig,
}

/// Snowfall tuning. Spawn rate is a percentage evaluated once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub snowflake_spawn_rate: f64,
    pub snowflake_speed_min: f64,
    pub snowflake_speed_max: f64,
    pub snowflake_size_min: f64,
    pub snowflake_size_max: f64,
    pub snowflake_spawn_y: f64,
    pub background_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleighConfig {
    pub width: f64,
    pub height: f64,
    /// Distance from the bottom edge of the canvas to the sleigh center.
    pub bottom_offset: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    /// Below this absolute speed an idle sleigh snaps to a standstill.
    pub deceleration: f64,
    /// Per-frame speed multiplier while no direction is held.
    pub friction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub max_canvas_width: u32,
    pub max_canvas_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub frame_rate: u32,
    pub key_hold_ms: u64,
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub translations_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub registry_file: String,
}

/// The slice of configuration the simulation needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineSettings {
    pub game: GameConfig,
    pub sleigh: SleighConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            snowflake_spawn_rate: 50.0,
            snowflake_speed_min: 2.0,
            snowflake_speed_max: 4.0,
            snowflake_size_min: 5.0,
            snowflake_size_max: 15.0,
            snowflake_spawn_y: -20.0,
            background_speed: 2.0,
        }
    }
}

impl Default for SleighConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 30.0,
            bottom_offset: 60.0,
            max_speed: 8.0,
            acceleration: 0.5,
            deceleration: 0.2,
            friction: 0.95,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            sleigh: SleighConfig::default(),
            display: DisplayConfig {
                max_canvas_width: 600,
                max_canvas_height: 800,
                cell_width: 10,
                cell_height: 20,
                frame_rate: 60,
                key_hold_ms: 400,
                theme: "default".to_string(),
            },
            i18n: I18nConfig {
                default_language: "en".to_string(),
                translations_dir: PathBuf::from("./assets/translations/webapp"),
            },
            paths: PathConfig {
                data_dir: PathBuf::from("./assets/data"),
                logs_dir: PathBuf::from("./assets/logs"),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            analytics: AnalyticsConfig {
                enabled: true,
                registry_file: "users.json".to_string(),
            },
        }
    }
}

impl Config {
    /// Loads a TOML file and layers `SLEIGH_RUSH__*` environment variables on top.
    /// A missing file is created with defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GameResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        let layered = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = layered
            .try_deserialize()
            .map_err(|e| GameError::configuration(format!("Failed to parse config file: {}", e)))?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GameResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GameError::configuration(format!("Failed to create config directory: {}", e)))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| GameError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_content)
            .map_err(|e| GameError::configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            game: self.game.clone(),
            sleigh: self.sleigh.clone(),
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.analytics.registry_file)
    }

    pub fn ensure_directories(&self) -> GameResult<()> {
        let dirs = [&self.paths.data_dir, &self.paths.logs_dir];

        for dir in &dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| GameError::configuration(format!("Failed to create directory {:?}: {}", dir, e)))?;
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> GameResult<()> {
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(GameError::configuration("Invalid logging level")),
        }

        let game = &self.game;
        if !(0.0..=100.0).contains(&game.snowflake_spawn_rate) {
            return Err(GameError::configuration("Snowflake spawn rate must be between 0 and 100"));
        }
        if game.snowflake_speed_min <= 0.0 || game.snowflake_speed_min > game.snowflake_speed_max {
            return Err(GameError::configuration("Snowflake speed range is invalid"));
        }
        if game.snowflake_size_min <= 0.0 || game.snowflake_size_min > game.snowflake_size_max {
            return Err(GameError::configuration("Snowflake size range is invalid"));
        }

        let sleigh = &self.sleigh;
        if sleigh.width <= 0.0 || sleigh.height <= 0.0 {
            return Err(GameError::configuration("Sleigh dimensions must be positive"));
        }
        if sleigh.max_speed <= 0.0 || sleigh.acceleration <= 0.0 {
            return Err(GameError::configuration("Sleigh speed and acceleration must be positive"));
        }
        if !(0.0..1.0).contains(&sleigh.friction) {
            return Err(GameError::configuration("Sleigh friction must be in [0, 1)"));
        }

        let display = &self.display;
        if display.frame_rate == 0 || display.frame_rate > MAX_FRAME_RATE {
            return Err(GameError::configuration(format!(
                "Frame rate must be between 1 and {}",
                MAX_FRAME_RATE
            )));
        }
        if display.cell_width == 0 || display.cell_height == 0 {
            return Err(GameError::configuration("Cell size must be greater than 0"));
        }
        if display.max_canvas_width == 0 || display.max_canvas_height == 0 {
            return Err(GameError::configuration("Canvas limits must be greater than 0"));
        }

        if self.i18n.default_language.len() < 2 {
            return Err(GameError::configuration("Default language must be a language tag"));
        }

        Ok(())
    }

    pub fn merge_with_cli(&mut self, cli_config: CliConfig) {
        if let Some(language) = cli_config.language {
            self.i18n.default_language = language;
        }
        if let Some(translations_dir) = cli_config.translations_dir {
            self.i18n.translations_dir = translations_dir;
        }
        if let Some(log_level) = cli_config.log_level {
            self.logging.level = log_level;
        }
        if cli_config.debug {
            self.logging.level = "debug".to_string();
        }
        if let Some(theme) = cli_config.theme {
            self.display.theme = theme;
        }
        if cli_config.no_analytics {
            self.analytics.enabled = false;
        }
    }

    /// Milliseconds between frames, never below 1.
    pub fn frame_interval_ms(&self) -> u64 {
        (1000 / self.display.frame_rate.max(1) as u64).max(1)
    }
}

// Configuration that can be overridden by CLI arguments
#[derive(Debug, Default)]
pub struct CliConfig {
    pub language: Option<String>,
    pub translations_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub debug: bool,
    pub theme: Option<String>,
    pub no_analytics: bool,
}
