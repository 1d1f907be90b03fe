use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::navigation::default_separators;

const CONFIG_DIR: &str = ".codenav";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding `navigation.context_lines`.
pub const CONTEXT_LINES_ENV: &str = "LSP_CONTEXT_LINES";

/// Context lines used when neither the config file nor the environment set one.
pub const DEFAULT_CONTEXT_LINES: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub lsp: LspConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Lines shown above and below each reference
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Separators between a type and a method name in qualified symbol names
    #[serde(default = "default_separators")]
    pub method_separators: Vec<String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            context_lines: default_context_lines(),
            method_separators: default_separators(),
        }
    }
}

fn default_context_lines() -> usize {
    DEFAULT_CONTEXT_LINES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LspConfig {
    /// Language server executable
    #[serde(default = "default_lsp_command")]
    pub command: String,

    /// Arguments passed to the language server
    #[serde(default)]
    pub args: Vec<String>,

    /// Seconds to wait for any single request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Sent verbatim as `initializationOptions`
    #[serde(default)]
    pub initialization_options: Option<serde_json::Value>,
}

impl Default for LspConfig {
    fn default() -> Self {
        Self {
            command: default_lsp_command(),
            args: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            initialization_options: None,
        }
    }
}

fn default_lsp_command() -> String {
    "gopls".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rotating files
    #[serde(default)]
    pub enabled: bool,

    /// Also log to stderr (filtered by RUST_LOG)
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// File log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory, relative to the workspace unless absolute
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Rotation: minutely, hourly, daily, never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_true(),
            level: default_log_level(),
            directory: default_log_directory(),
            rotation: default_rotation(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("logs")
}

fn default_rotation() -> String {
    "daily".to_string()
}

fn default_file_prefix() -> String {
    "codenav.log".to_string()
}

/// Parse a context-line override. Anything but a non-negative integer is ignored.
pub fn parse_context_lines(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
}

impl Config {
    /// Load configuration from the .codenav directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = Self::config_path(root);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .codenav directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = Self::config_dir(root);
        let config_path = Self::config_path(root);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    pub fn config_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    pub fn config_path(root: &Path) -> PathBuf {
        Self::config_dir(root).join(CONFIG_FILE)
    }

    pub fn is_initialized(root: &Path) -> bool {
        Self::config_path(root).exists()
    }

    /// Apply `LSP_CONTEXT_LINES` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        let raw = std::env::var(CONTEXT_LINES_ENV).ok();
        self.with_context_override(raw.as_deref())
    }

    fn with_context_override(mut self, raw: Option<&str>) -> Self {
        if let Some(lines) = parse_context_lines(raw) {
            self.navigation.context_lines = lines;
        }
        self
    }
}
