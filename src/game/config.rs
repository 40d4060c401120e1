use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// How a new apple chooses its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppleRule {
    /// Any cell on the board, even one under the snake
    #[default]
    Anywhere,
    /// Only cells the snake does not occupy
    AvoidSnake,
}

/// Configuration for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in pixels
    pub board_width: u32,
    /// Board height in pixels
    pub board_height: u32,
    /// Pixel size of one cell
    pub unit_size: u32,
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Initial length of the snake
    pub seed_length: usize,
    pub apple_rule: AppleRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 400,
            board_height: 400,
            unit_size: 20,
            tick_interval_ms: 120,
            seed_length: 6,
            apple_rule: AppleRule::Anywhere,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom speed and cell size
    pub fn new(tick_interval_ms: u64, unit_size: u32) -> Self {
        Self {
            tick_interval_ms,
            unit_size,
            ..Default::default()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.board_width, self.board_height, self.unit_size)
    }

    /// Reject values that would give a degenerate board or timer.
    ///
    /// The game core trusts its configuration; callers that build one from
    /// user input check it here first.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.tick_interval_ms > 0, "tick interval must be positive");
        ensure!(self.unit_size > 0, "unit size must be positive");
        ensure!(
            self.board_width % self.unit_size == 0 && self.board_height % self.unit_size == 0,
            "board {}x{} is not a whole number of {}px cells",
            self.board_width,
            self.board_height,
            self.unit_size
        );
        let columns = (self.board_width / self.unit_size) as usize;
        ensure!(self.board_height >= self.unit_size, "board has no rows");
        ensure!(
            self.seed_length >= 1 && self.seed_length <= columns,
            "snake of length {} does not fit in {} columns",
            self.seed_length,
            columns
        );
        Ok(())
    }
}

/// Settings a user has asked for, each one optional.
///
/// Layers stack as preset, then config file, then command line flags; a field
/// left `None` falls through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub board_width: Option<u32>,
    pub board_height: Option<u32>,
    pub unit_size: Option<u32>,
    pub tick_interval_ms: Option<u64>,
    pub seed_length: Option<usize>,
    pub apple_rule: Option<AppleRule>,
}

impl ConfigOverrides {
    /// Load overrides from a JSON file; fields the file omits stay unset.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let overrides: ConfigOverrides = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(overrides)
    }

    /// Stack `top` over `self`; fields set in `top` win.
    pub fn layered(self, top: ConfigOverrides) -> Self {
        Self {
            board_width: top.board_width.or(self.board_width),
            board_height: top.board_height.or(self.board_height),
            unit_size: top.unit_size.or(self.unit_size),
            tick_interval_ms: top.tick_interval_ms.or(self.tick_interval_ms),
            seed_length: top.seed_length.or(self.seed_length),
            apple_rule: top.apple_rule.or(self.apple_rule),
        }
    }

    /// True when speed or cell size is pinned, which is enough to skip the menu
    pub fn sets_pace(&self) -> bool {
        self.tick_interval_ms.is_some() || self.unit_size.is_some()
    }

    pub fn apply_to(&self, mut config: GameConfig) -> GameConfig {
        if let Some(board_width) = self.board_width {
            config.board_width = board_width;
        }
        if let Some(board_height) = self.board_height {
            config.board_height = board_height;
        }
        if let Some(unit_size) = self.unit_size {
            config.unit_size = unit_size;
        }
        if let Some(tick_interval_ms) = self.tick_interval_ms {
            config.tick_interval_ms = tick_interval_ms;
        }
        if let Some(seed_length) = self.seed_length {
            config.seed_length = seed_length;
        }
        if let Some(apple_rule) = self.apple_rule {
            config.apple_rule = apple_rule;
        }
        config
    }

    /// Defaults with these overrides on top
    pub fn base(&self) -> GameConfig {
        self.apply_to(GameConfig::default())
    }

    /// A difficulty preset with these overrides on top
    pub fn preset(&self, difficulty: Difficulty) -> GameConfig {
        self.apply_to(difficulty.apply(&GameConfig::default()))
    }
}

/// Speed and cell-size presets offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
        }
    }

    /// (tick interval in ms, unit size in px)
    pub fn settings(&self) -> (u64, u32) {
        match self {
            Difficulty::Easy => (200, 40),
            Difficulty::Normal => (120, 20),
            Difficulty::Hard => (80, 20),
            Difficulty::Insane => (60, 10),
        }
    }

    /// Apply this preset's speed and cell size on top of `base`
    pub fn apply(&self, base: &GameConfig) -> GameConfig {
        let (tick_interval_ms, unit_size) = self.settings();
        GameConfig {
            tick_interval_ms,
            unit_size,
            ..base.clone()
        }
    }
}
