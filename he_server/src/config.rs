//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use holdem_engine::{EngineTiming, Environment, MAX_PLAYERS, TableConfig, entities::Usd};
use std::{net::SocketAddr, str::FromStr};

/// Bind address when neither `--bind` nor `SERVER_BIND` is given.
pub const DEFAULT_BIND: &str = "127.0.0.1:6969";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Selects the engine pacing preset
    pub environment: Environment,
    /// Applied to every table started through the API
    pub table_defaults: TableDefaults,
}

/// Table settings the API doesn't take from the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDefaults {
    pub max_players: usize,
    pub timebank_total: u32,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            max_players: MAX_PLAYERS,
            timebank_total: holdem_engine::constants::DEFAULT_TIMEBANK_TOTAL,
        }
    }
}

impl TableDefaults {
    /// Table config for a room with the given blinds.
    pub fn table_config(&self, room_name: String, small_blind: Usd, big_blind: Usd) -> TableConfig {
        TableConfig {
            room_name,
            small_blind,
            big_blind,
            timebank_total: self.timebank_total,
            max_players: self.max_players,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `env_override` - Optional environment override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed, or the
    /// resulting configuration is out of range
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        env_override: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), bind_override, env_override)
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        bind_override: Option<SocketAddr>,
        env_override: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_var(&lookup, "SERVER_BIND")?.unwrap_or(default_bind()),
        };

        let environment = match env_override {
            Some(environment) => environment,
            None => parse_var(&lookup, "ENGINE_ENV")?.unwrap_or_default(),
        };

        let table_defaults = TableDefaults {
            max_players: parse_var(&lookup, "TABLE_MAX_PLAYERS")?.unwrap_or(MAX_PLAYERS),
            timebank_total: parse_var(&lookup, "TIMEBANK_TOTAL")?
                .unwrap_or(holdem_engine::constants::DEFAULT_TIMEBANK_TOTAL),
        };

        let config = ServerConfig {
            bind,
            environment,
            table_defaults,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_PLAYERS).contains(&self.table_defaults.max_players) {
            return Err(ConfigError::Invalid {
                var: "TABLE_MAX_PLAYERS".to_string(),
                reason: format!("Must be between 2 and {MAX_PLAYERS}"),
            });
        }

        if self.table_defaults.timebank_total == 0 {
            return Err(ConfigError::Invalid {
                var: "TIMEBANK_TOTAL".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn engine_timing(&self) -> EngineTiming {
        EngineTiming::for_environment(self.environment)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6969))
}

/// Parses `key` if it's set; a set but unparseable value is an error
/// rather than a silent fallback.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
