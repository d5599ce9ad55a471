use anyhow::{Context, Result};
use clap::Parser;
use sleigh_rush::{CliConfig, Config, GameInterface, UserProfile, VERSION};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, error};

#[derive(Parser)]
#[command(name = "sleigh-rush")]
#[command(about = "Steer a sleigh through falling snow")]
#[command(version = VERSION)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Interface language (ru*, otherwise English)
    #[arg(short, long)]
    lang: Option<String>,

    /// Directory with <lang>.json translation tables
    #[arg(long)]
    translations: Option<PathBuf>,

    /// Numeric user id; enables launch tracking
    #[arg(long)]
    user_id: Option<i64>,

    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    /// Seed for reproducible snowfall
    #[arg(long)]
    seed: Option<u64>,

    /// Color theme (default, night)
    #[arg(short, long)]
    theme: Option<String>,

    /// Do not record launches in the user registry
    #[arg(long)]
    no_analytics: bool,
}

impl Cli {
    fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.user_id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            language_code: self.lang.clone(),
            ..UserProfile::guest()
        }
    }

    fn overrides(&self) -> CliConfig {
        CliConfig {
            language: self.lang.clone(),
            translations_dir: self.translations.clone(),
            log_level: None,
            debug: self.debug,
            theme: self.theme.clone(),
            no_analytics: self.no_analytics,
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let log_path = config.paths.logs_dir.join("sleigh-rush.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    // the terminal belongs to the playfield, so logs go to a file
    tracing_subscriber::fmt()
        .with_env_filter(format!("sleigh_rush={},warn", config.logging.level))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::default(),
    };
    config.merge_with_cli(cli.overrides());
    config.validate()?;
    config.ensure_directories()?;

    init_logging(&config)?;
    info!("Starting Sleigh Rush v{}", VERSION);

    let mut game_interface = GameInterface::new(config, cli.profile(), cli.seed).await?;

    if let Err(e) = game_interface.run().await {
        error!("Game error: {}", e);
        eprintln!("An error occurred: {}", e);
        std::process::exit(1);
    }

    info!("Game session ended");
    Ok(())
}
