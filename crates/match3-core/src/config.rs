//! Host-supplied customizations and engine tunables.
//!
//! `Customizations` is the same object the game builder hands to every preview
//! game. Only `difficulty` reaches engine logic (it picks the grid size); the
//! rest is presentation. `EngineConfig` holds the timing and scoring constants.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::grid::{Color, EMPTY};

/// Errors from parsing or validating configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Unknown color scheme: {0}")]
    UnknownColorScheme(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Need at least 2 colors, got {0}")]
    TooFewColors(u8),

    #[error("At most {max} colors are supported, got {got}")]
    TooManyColors { got: u8, max: u8 },

    #[error("Auto-scan interval must be greater than zero")]
    ZeroScanInterval,

    #[error("Invalid customizations JSON: {0}")]
    InvalidJson(String),
}

/// Difficulty level, which selects the board size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Side length of the board for this difficulty
    pub fn grid_size(&self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 8,
            Difficulty::Hard => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Named tile palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Orange,
    Pink,
}

/// Tailwind shades used for the five tile colors, lightest first
const SHADES: [u16; 5] = [300, 400, 500, 600, 700];

impl ColorScheme {
    pub const ALL: [ColorScheme; 6] = [
        ColorScheme::Blue,
        ColorScheme::Green,
        ColorScheme::Purple,
        ColorScheme::Red,
        ColorScheme::Orange,
        ColorScheme::Pink,
    ];

    /// Identifier used in CSS class names and JSON
    pub fn id(&self) -> &'static str {
        match self {
            ColorScheme::Blue => "blue",
            ColorScheme::Green => "green",
            ColorScheme::Purple => "purple",
            ColorScheme::Red => "red",
            ColorScheme::Orange => "orange",
            ColorScheme::Pink => "pink",
        }
    }

    /// Name shown in the builder
    pub fn display_name(&self) -> &'static str {
        match self {
            ColorScheme::Blue => "Ocean Blue",
            ColorScheme::Green => "Forest Green",
            ColorScheme::Purple => "Royal Purple",
            ColorScheme::Red => "Fire Red",
            ColorScheme::Orange => "Sunset Orange",
            ColorScheme::Pink => "Bubblegum Pink",
        }
    }

    /// Background class for a tile color.
    ///
    /// Empty cells and colors past the five-shade palette have no class.
    pub fn color_class(&self, color: Color) -> Option<String> {
        if color == EMPTY {
            return None;
        }
        let shade = SHADES.get(color as usize)?;
        Some(format!("bg-{}-{}", self.id(), shade))
    }
}

impl FromStr for ColorScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorScheme::ALL
            .into_iter()
            .find(|scheme| scheme.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownColorScheme(s.to_string()))
    }
}

/// Visual style of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Modern,
    Retro,
    Neon,
}

/// Presentation flags derived from a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TileStyle {
    /// Hard black tile borders
    pub bordered: bool,
    /// Drop shadow glow around tiles
    pub glow: bool,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Classic, Theme::Modern, Theme::Retro, Theme::Neon];

    pub fn id(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Modern => "modern",
            Theme::Retro => "retro",
            Theme::Neon => "neon",
        }
    }

    pub fn tile_style(&self) -> TileStyle {
        match self {
            Theme::Retro => TileStyle {
                bordered: true,
                glow: false,
            },
            Theme::Neon => TileStyle {
                bordered: false,
                glow: true,
            },
            Theme::Classic | Theme::Modern => TileStyle::default(),
        }
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownTheme(s.to_string()))
    }
}

/// The builder's customization object, shared by every preview game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customizations {
    pub theme: Theme,
    pub difficulty: Difficulty,
    pub color_scheme: ColorScheme,
    pub features: Vec<String>,
    pub sound_enabled: bool,
    pub power_ups: bool,
    pub multiplayer: bool,
}

impl Default for Customizations {
    fn default() -> Self {
        Self {
            theme: Theme::Classic,
            difficulty: Difficulty::Medium,
            color_scheme: ColorScheme::Blue,
            features: Vec::new(),
            sound_enabled: true,
            power_ups: false,
            multiplayer: false,
        }
    }
}

impl Customizations {
    /// Parse the JSON object the builder passes to its preview games
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn grid_size(&self) -> usize {
        self.difficulty.grid_size()
    }
}

/// Largest palette that still leaves room for the `EMPTY` sentinel
pub const MAX_COLORS: u8 = 250;

/// Engine timing and scoring constants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of distinct tile colors
    pub color_count: u8,
    /// Period of the player-independent match scan
    pub auto_scan_interval: Duration,
    /// Pause between a matching swap and the start of the clear
    pub swap_settle_delay: Duration,
    /// How long a clear keeps the board locked before the cascade lands
    pub clear_delay: Duration,
    /// Points awarded per removed tile
    pub points_per_tile: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            color_count: 5,
            auto_scan_interval: Duration::from_millis(1000),
            swap_settle_delay: Duration::from_millis(100),
            clear_delay: Duration::from_millis(300),
            points_per_tile: 10,
        }
    }
}

impl EngineConfig {
    /// Config with no delays: every cascade lands in the same call that found it
    pub fn instant() -> Self {
        Self {
            swap_settle_delay: Duration::ZERO,
            clear_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.color_count < 2 {
            return Err(ConfigError::TooFewColors(self.color_count));
        }
        if self.color_count > MAX_COLORS {
            return Err(ConfigError::TooManyColors {
                got: self.color_count,
                max: MAX_COLORS,
            });
        }
        if self.auto_scan_interval.is_zero() {
            return Err(ConfigError::ZeroScanInterval);
        }
        Ok(())
    }

    /// Delay between finding matches and landing the cascade
    pub fn resolve_delay(&self, after_swap: bool) -> Duration {
        if after_swap {
            self.swap_settle_delay + self.clear_delay
        } else {
            self.clear_delay
        }
    }
}
