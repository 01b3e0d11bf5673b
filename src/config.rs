//! Configuration loading and database path resolution
//!
//! Settings come from a TOML file with CLI flags layered on top.
//! The database path resolves with priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MBGAP_DB`)
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default item format: one placeholder track per line
pub const DEFAULT_FORMAT_ITEM: &str = "$artist - $album - $title";

/// Default album format: one placeholder album per line
pub const DEFAULT_FORMAT_ALBUM: &str = "$albumartist - $album";

/// TOML configuration file contents
///
/// All fields are optional; a missing config file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to the library SQLite database
    pub database: Option<PathBuf>,

    /// Release status filters for discography browsing (e.g. "official")
    #[serde(default)]
    pub release_status: Vec<String>,

    /// Release type filters for discography browsing (e.g. "album", "ep")
    #[serde(default)]
    pub release_type: Vec<String>,

    /// Default for the `--count` switch
    #[serde(default)]
    pub count: bool,

    /// Default for the `--total` switch
    #[serde(default)]
    pub total: bool,

    /// Default for the `--album` switch
    #[serde(default)]
    pub album: bool,

    /// Format template for placeholder tracks
    pub format_item: Option<String>,

    /// Format template for placeholder albums and count lines
    pub format_album: Option<String>,
}

impl TomlConfig {
    pub fn format_item(&self) -> &str {
        self.format_item.as_deref().unwrap_or(DEFAULT_FORMAT_ITEM)
    }

    pub fn format_album(&self) -> &str {
        self.format_album.as_deref().unwrap_or(DEFAULT_FORMAT_ALBUM)
    }
}

/// Load configuration from `path`, or from the default location when `path`
/// is `None`.
///
/// An explicitly-given path must exist and parse; the default location is
/// allowed to be absent (defaults apply).
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => {
                warn!("Could not determine config directory; using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    if !path.exists() {
        if explicit {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        debug!("No config file at {}; using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Resolve the library database path
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("MBGAP_DB") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.database {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_database_path()
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mbgap").join("config.toml"))
}

/// OS-dependent default library database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mbgap").join("library.db"))
        .unwrap_or_else(|| PathBuf::from("./mbgap_data/library.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_default_config_is_ok() {
        let config = load_config(None).expect("defaults should load");
        assert!(!config.album);
        assert_eq!(config.format_item(), DEFAULT_FORMAT_ITEM);
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let result = load_config(Some(Path::new("/nonexistent/mbgap.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
database = "/music/library.db"
release_status = ["official"]
release_type = ["album", "ep"]
count = true
format_album = "$albumartist :: $album"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).expect("config should parse");
        assert_eq!(config.database.as_deref(), Some(Path::new("/music/library.db")));
        assert_eq!(config.release_status, vec!["official"]);
        assert_eq!(config.release_type, vec!["album", "ep"]);
        assert!(config.count);
        assert!(!config.total);
        assert_eq!(config.format_album(), "$albumartist :: $album");
        assert_eq!(config.format_item(), DEFAULT_FORMAT_ITEM);
    }

    #[test]
    fn test_database_path_priority() {
        let config = TomlConfig {
            database: Some(PathBuf::from("/from/toml.db")),
            ..Default::default()
        };

        // CLI wins over TOML
        let resolved = resolve_database_path(Some(Path::new("/from/cli.db")), &config);
        assert_eq!(resolved, PathBuf::from("/from/cli.db"));

        // TOML wins over compiled default (env var not set under test)
        let resolved = resolve_database_path(None, &config);
        assert_eq!(resolved, PathBuf::from("/from/toml.db"));
    }
}
