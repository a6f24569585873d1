use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::report::page::DEFAULT_STYLESHEET;

/// Top-level configuration, loaded from a YAML file.
///
/// Every section is defaulted, so a missing or empty file yields a working
/// server. The file path defaults to `beacon.yaml` and can be overridden
/// with the `BEACON_CONFIG` environment variable.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub page: PageConfig,
    pub scripts: ScriptsConfig,
    pub job: JobConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port to bind on all interfaces.
    pub port: u16,
    /// Worker pool size; defaults to the number of available cores.
    pub workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Auto-refresh period in milliseconds while the job is running.
    pub refresh_ms: u64,
    /// Optional path to a stylesheet inlined into the page.
    pub stylesheet: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Directory expected to contain `triggers/` and `states/`.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Shell command run by the default job implementation on a forced run.
    pub command: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            refresh_ms: 5000,
            stylesheet: None,
        }
    }
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            command: "echo no job command configured".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load() -> Self {
        let path =
            std::env::var("BEACON_CONFIG").unwrap_or_else(|_| "beacon.yaml".to_string());

        match std::fs::read_to_string(&path) {
            Ok(text) => match serde_yaml::from_str(&text) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Ignoring invalid config {}: {}", path, e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }
}

impl PageConfig {
    /// The stylesheet text to inline: the configured file if readable, the
    /// built-in default otherwise.
    pub fn stylesheet_text(&self) -> String {
        match &self.stylesheet {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Could not read stylesheet {}: {}", path.display(), e);
                    DEFAULT_STYLESHEET.to_string()
                }
            },
            None => DEFAULT_STYLESHEET.to_string(),
        }
    }
}
