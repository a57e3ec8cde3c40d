//! Plugin-side configuration loading and defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name
pub const CONFIG_FILE: &str = ".crosshost.json";

fn default_language() -> String {
    "en".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Language code of the message file (`messages_<language>.yml`)
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory holding message files; bundled messages are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_dir: Option<PathBuf>,

    /// Force HEX color output on or off for the game server host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_colors: Option<bool>,

    /// Tracing filter directive, e.g. `info` or `crosshost=debug`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Command-table namespace; defaults to the lower-cased plugin name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            messages_dir: None,
            hex_colors: None,
            log_filter: default_log_filter(),
            namespace: None,
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether the game server should get HEX colors. `disabled` is the
    /// command-line switch and beats the file setting.
    pub fn use_hex_colors(&self, disabled: bool) -> bool {
        !disabled && self.hex_colors.unwrap_or(true)
    }

    /// Load `path` if it exists, otherwise the defaults.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
