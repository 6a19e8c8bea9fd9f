//! Table configuration models.

use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};
use thiserror::Error;

use crate::game::{
    constants::{DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, DEFAULT_TIMEBANK_TOTAL, MAX_PLAYERS},
    entities::{Blinds, Usd},
};

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("room name must not be empty")]
    EmptyRoomName,
    #[error("small blind must be positive")]
    ZeroSmallBlind,
    #[error("big blind ({big}) must be at least the small blind ({small})")]
    BlindsOutOfOrder { small: Usd, big: Usd },
    #[error("max players must be between 2 and {max}, got {0}", max = MAX_PLAYERS)]
    MaxPlayers(usize),
    #[error("unknown environment `{0}` (expected dev or prod)")]
    UnknownEnvironment(String),
}

/// Settings for a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub room_name: String,
    pub small_blind: Usd,
    pub big_blind: Usd,
    /// Starting time bank for each player, in seconds. Reported only.
    #[serde(default = "default_timebank_total")]
    pub timebank_total: u32,
    #[serde(default = "default_max_players")]
    pub max_players: usize,
}

fn default_timebank_total() -> u32 {
    DEFAULT_TIMEBANK_TOTAL
}

fn default_max_players() -> usize {
    MAX_PLAYERS
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            room_name: "default".to_string(),
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            timebank_total: DEFAULT_TIMEBANK_TOTAL,
            max_players: MAX_PLAYERS,
        }
    }
}

impl TableConfig {
    pub fn new(room_name: impl Into<String>, small_blind: Usd, big_blind: Usd) -> Self {
        Self {
            room_name: room_name.into(),
            small_blind,
            big_blind,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_name.trim().is_empty() {
            return Err(ConfigError::EmptyRoomName);
        }
        if self.small_blind == 0 {
            return Err(ConfigError::ZeroSmallBlind);
        }
        if self.big_blind < self.small_blind {
            return Err(ConfigError::BlindsOutOfOrder {
                small: self.small_blind,
                big: self.big_blind,
            });
        }
        if !(2..=MAX_PLAYERS).contains(&self.max_players) {
            return Err(ConfigError::MaxPlayers(self.max_players));
        }
        Ok(())
    }

    pub fn blinds(&self) -> Blinds {
        Blinds {
            small: self.small_blind,
            big: self.big_blind,
        }
    }
}

/// Deployment environment, selecting an [`EngineTiming`] preset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Engine loop cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineTiming {
    /// Idle wait between ticks outside of pauses.
    pub loop_pause: Duration,
    /// Pause after blinds, street ends, showdowns and fold-outs.
    pub pause_medium: Duration,
    /// Pause between hands.
    pub pause_long: Duration,
}

impl EngineTiming {
    pub fn dev() -> Self {
        Self {
            loop_pause: Duration::from_millis(10),
            pause_medium: Duration::from_millis(2),
            pause_long: Duration::from_millis(5000),
        }
    }

    pub fn prod() -> Self {
        Self {
            loop_pause: Duration::from_millis(10),
            pause_medium: Duration::from_millis(1500),
            pause_long: Duration::from_millis(2000),
        }
    }

    /// The same wait everywhere. Handy for driving tables in tests.
    pub fn uniform(pause: Duration) -> Self {
        Self {
            loop_pause: pause,
            pause_medium: pause,
            pause_long: pause,
        }
    }

    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Dev => Self::dev(),
            Environment::Prod => Self::prod(),
        }
    }
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self::dev()
    }
}
