use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use grid_snake::game::{AppleRule, ConfigOverrides, Difficulty, GameConfig};
use grid_snake::modes::PlayMode;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Classic snake on a fixed grid")]
struct Cli {
    /// Start straight away at this difficulty instead of showing the menu
    #[arg(long)]
    difficulty: Option<Level>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Cell size in pixels of the 400x400 board
    #[arg(long)]
    unit_size: Option<u32>,

    /// Never drop an apple onto the snake
    #[arg(long)]
    avoid_snake: bool,

    /// Seed for apple placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Easy,
    Normal,
    Hard,
    Insane,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Normal => Difficulty::Normal,
            Level::Hard => Difficulty::Hard,
            Level::Insane => Difficulty::Insane,
        }
    }
}

impl Cli {
    /// Config file, then command line flags; difficulty presets sit underneath
    fn overrides(&self) -> Result<ConfigOverrides> {
        let file = match &self.config {
            Some(path) => ConfigOverrides::from_json_file(path)?,
            None => ConfigOverrides::default(),
        };
        let flags = ConfigOverrides {
            tick_interval_ms: self.tick_ms,
            unit_size: self.unit_size,
            apple_rule: self.avoid_snake.then_some(AppleRule::AvoidSnake),
            ..Default::default()
        };
        Ok(file.layered(flags))
    }

    /// The config to skip the menu with, if the flags or file ask for one
    fn initial_config(&self, overrides: &ConfigOverrides) -> Option<GameConfig> {
        match self.difficulty {
            Some(level) => Some(overrides.preset(level.into())),
            None if overrides.sets_pace() => Some(overrides.base()),
            None => None,
        }
    }
}

/// Without a log file the terminal belongs to the game, so stderr gets
/// warnings and errors only, whatever `RUST_LOG` asks for.
fn stderr_cap(log_file: bool) -> LevelFilter {
    if log_file {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    log::set_max_level(log::max_level().min(stderr_cap(log_file.is_some())));
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let overrides = cli.overrides()?;
    let initial = cli.initial_config(&overrides);

    let mut play_mode = PlayMode::new(overrides, initial, cli.seed)?;
    play_mode.run().await?;

    Ok(())
}
