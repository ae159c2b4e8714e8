//! Runtime configuration
//!
//! Settings come from, in order of precedence: command-line flags (and their
//! environment variables), the optional `config.toml`, then built-in defaults.

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "snipman";
const STORE_FILE: &str = "snippets.json";
const CONFIG_FILE: &str = "config.toml";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub file: Option<PathBuf>,
    pub editor: Option<String>,
    pub color: Option<bool>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_path: PathBuf,
    /// Command used to edit snippet code; `None` means inline entry.
    pub editor: Option<String>,
    pub color: bool,
}

impl Config {
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let file = match &overrides.config {
            Some(path) => load_config_file(path)?
                .with_context(|| format!("Config file {} does not exist", path.display()))?,
            None => match default_config_path() {
                Some(path) => load_config_file(&path)?.unwrap_or_default(),
                None => ConfigFile::default(),
            },
        };

        let config = Self::merge(overrides, file, editor_from_env());
        debug!("Resolved config: {:?}", config);
        Ok(config)
    }

    fn merge(overrides: Overrides, file: ConfigFile, env_editor: Option<String>) -> Self {
        let store_path = overrides
            .file
            .or(file.file)
            .unwrap_or_else(default_store_path);
        let editor = file
            .editor
            .or(env_editor)
            .filter(|e| !e.trim().is_empty());
        let color = !overrides.no_color && file.color.unwrap_or(true);

        Self {
            store_path,
            editor,
            color,
        }
    }
}

/// `<data dir>/snipman/snippets.json`, or `./snippets.json` on platforms
/// without a data directory.
pub fn default_store_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_DIR).join(STORE_FILE),
        None => PathBuf::from(STORE_FILE),
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `Ok(None)` when the file does not exist.
fn load_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read config file {}", path.display()));
        }
    };

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    if file.file.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
        bail!("Config file {}: `file` must not be empty", path.display());
    }
    Ok(Some(file))
}

fn editor_from_env() -> Option<String> {
    ["VISUAL", "EDITOR"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
}
