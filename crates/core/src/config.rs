//! Application configuration.
//!
//! Settings are layered: built-in defaults, then the optional
//! `~/.config/race20/config.toml`, then `RACE20_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Directory under the user's config dir holding our files.
pub const CONFIG_DIR: &str = "race20";
/// Name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `RACE20_SEED=7`.
pub const ENV_PREFIX: &str = "RACE20";

const DEFAULT_BOARD_PATH: &str = "events.txt";
const DEFAULT_SESSION: &str = "local";
const DEFAULT_LOG_DIR: &str = "logs";

const DEFAULT_CONFIG: &str = r#"# Race to 20 configuration.

# Board file placing Troll, Hotel and Shortcut events on spaces.
# Relative paths are resolved against the working directory.
board_path = "events.txt"

# Session key the terminal client plays under.
session = "local"

# Where log files are written.
log_dir = "logs"

# Fix the dice sequence for reproducible games.
# seed = 42
"#;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Board file read once at startup.
    pub board_path: PathBuf,
    /// Dice seed; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Session key used by the terminal client.
    pub session: String,
    /// Directory receiving log files.
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            board_path: PathBuf::from(DEFAULT_BOARD_PATH),
            seed: None,
            session: DEFAULT_SESSION.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl AppConfig {
    /// Load from the default config file location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load using `path` as the config file. The file may be absent.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .set_default("board_path", DEFAULT_BOARD_PATH)?
            .set_default("session", DEFAULT_SESSION)?
            .set_default("log_dir", DEFAULT_LOG_DIR)?
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }
}

/// Default location of the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default config if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write the commented default config to `path` unless it already exists.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.board_path, PathBuf::from("events.txt"));
        assert_eq!(config.session, "local");
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        Ok(())
    }

    #[test]
    fn default_file_parses_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("race20").join(CONFIG_FILE);

        ensure_default_config_at(&path)?;
        assert!(path.is_file());
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.board_path, AppConfig::default().board_path);
        assert_eq!(config.session, AppConfig::default().session);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "board_path = \"boards/forest.txt\"\nseed = 1234\nsession = \"table-2\"\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.board_path, PathBuf::from("boards/forest.txt"));
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.session, "table-2");
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        Ok(())
    }

    #[test]
    fn existing_config_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "session = \"mine\"\n")?;

        ensure_default_config_at(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "session = \"mine\"\n");
        Ok(())
    }
}
