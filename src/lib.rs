pub mod config;
pub mod core;
pub mod i18n;
pub mod render;
pub mod ui;
pub mod utils;

pub use crate::config::{CliConfig, Config, EngineSettings};
pub use crate::core::{Direction, GameEngine, GamePhase, InputEvent, UserProfile};
pub use crate::i18n::Translator;
pub use crate::render::{Canvas, Color, TerminalCanvas};
pub use crate::ui::GameInterface;
pub use crate::utils::{GameError, GameResult};

pub type Result<T> = anyhow::Result<T>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
