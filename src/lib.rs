//! turnkeeper - combat tracker for tabletop role-playing sessions
//!
//! Tracks initiative order, rounds, hit points and timed status effects for
//! one encounter, persisting every change and keeping an undo history.

pub mod combat;
pub mod history;
pub mod ids;
pub mod shell;
pub mod storage;
pub mod text;
pub mod view;

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use combat::{CombatStoreBuilder, TieBreakerRule, DEFAULT_INITIATIVE_DICE};
use history::DEFAULT_HISTORY_LIMIT;
use storage::Storage;

/// Config file read from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "turnkeeper.toml";

/// Prefix for environment overrides, e.g. `TURNKEEPER_HISTORY_LIMIT=50`
pub const ENV_PREFIX: &str = "TURNKEEPER_";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the saved encounter
    pub storage_dir: PathBuf,
    /// Undo history capacity
    pub history_limit: usize,
    /// Initiative die for a fresh encounter; a saved encounter keeps its own
    pub initiative_dice: u32,
    /// Tie-breaker rule for a fresh encounter
    pub tie_breaker: TieBreakerRule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".turnkeeper"),
            history_limit: DEFAULT_HISTORY_LIMIT,
            initiative_dice: DEFAULT_INITIATIVE_DICE,
            tie_breaker: TieBreakerRule::default(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `TURNKEEPER_*` variables.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };
        debug!("Loading config from {}", file.display());

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(config)
    }

    /// Store builder over `storage` seeded with these settings
    pub fn store_builder<S: Storage>(&self, storage: S) -> CombatStoreBuilder<S> {
        combat::CombatStore::builder(storage)
            .history_limit(self.history_limit)
            .initiative_dice(self.initiative_dice)
            .tie_breaker_rule(self.tie_breaker)
    }
}
