use crate::error::{Error, Result};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "missingtube.toml";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    store_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("."),
            export_dir: PathBuf::from("."),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Loads the config file at `path`, falling back to defaults when it does
/// not exist.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|source| Error::ReadFailure {
        path: path.to_path_buf(),
        source,
    })?;
    let file: FileConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    let defaults = Config::default();
    Ok(Config {
        store_dir: file.store_dir.unwrap_or(defaults.store_dir),
        export_dir: file.export_dir.unwrap_or(defaults.export_dir),
        log_level: file.log_level.unwrap_or(defaults.log_level),
    })
}

pub fn load_config() -> Result<Config> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_all_fields() {
        let file = make_config(
            "store_dir = \"/var/lib/missingtube\"\nexport_dir = \"/tmp/out\"\nlog_level = \"debug\"\n",
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.store_dir, PathBuf::from("/var/lib/missingtube"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = make_config("export_dir = \"exports\"\n");
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(config.store_dir, PathBuf::from("."));
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let file = make_config("store_dir = [\n");
        assert!(matches!(load_config_from(file.path()), Err(Error::Config(_))));

        let unknown = make_config("colour = \"red\"\n");
        assert!(matches!(load_config_from(unknown.path()), Err(Error::Config(_))));
    }
}
