//! Configuration System
//!
//! Loads portal settings from a TOML file with environment variable
//! overrides. Every field has a default, so an empty file is valid.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub seed: SeedConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the collections live on disk
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("becas").to_string_lossy().to_string())
        .unwrap_or_else(|| "./becas_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Demo data loading
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Fill empty collections with demo records on startup
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

fn default_seed_enabled() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Reads an environment variable; injected so tests never touch the
/// process environment
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl PortalConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<LoadedConfig, ConfigError> {
        let mut config = Self::load(path)?;
        let warnings = config.apply_env_overrides(&process_env);
        Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
            warnings,
        })
    }

    /// Load from default locations or environment
    pub fn load_default() -> LoadedConfig {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("becas").join("config.toml")),
            Some(PathBuf::from("./becas.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::search(&config_paths, &process_env)
    }

    /// First readable file among `paths`, then environment overrides.
    /// Files that exist but fail to load are skipped and reported.
    pub fn search(paths: &[PathBuf], env: EnvLookup<'_>) -> LoadedConfig {
        let mut warnings = Vec::new();
        let mut found = None;

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load(path) {
                Ok(config) => {
                    found = Some((config, path.clone()));
                    break;
                }
                Err(e) => warnings.push(e),
            }
        }

        let (mut config, source) = match found {
            Some((config, path)) => (config, Some(path)),
            None => (PortalConfig::default(), None),
        };
        warnings.extend(config.apply_env_overrides(env));

        LoadedConfig {
            config,
            source,
            warnings,
        }
    }

    /// Apply `BECAS_*` overrides to an existing config. Returns the
    /// overrides that were ignored.
    pub fn apply_env_overrides(&mut self, env: EnvLookup<'_>) -> Vec<ConfigError> {
        let mut ignored = Vec::new();

        if let Some(data_dir) = env("BECAS_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(seed) = env("BECAS_SEED") {
            match parse_flag(&seed) {
                Some(enabled) => self.seed.enabled = enabled,
                None => ignored.push(ConfigError::InvalidEnv {
                    key: "BECAS_SEED",
                    value: seed,
                    expected: "true/false",
                }),
            }
        }

        if let Some(level) = env("BECAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env("BECAS_LOG_FORMAT") {
            self.logging.format = format;
        }

        ignored
    }

    /// Data directory with a leading `~` expanded to the home directory
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.storage.data_dir)
    }
}

fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(raw),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(|c: char| c == '/' || c == '\\')),
        None => PathBuf::from(raw),
    }
}

/// A loaded config plus what happened while loading it
///
/// Loading runs before the log subscriber exists, so diagnostics are
/// collected here and emitted by [`LoadedConfig::log`] afterwards.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: PortalConfig,
    /// File the config came from, `None` for defaults
    pub source: Option<PathBuf>,
    /// Skipped files and ignored overrides
    pub warnings: Vec<ConfigError>,
}

impl LoadedConfig {
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::warn!("{}", warning);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::debug!("Using default config with environment overrides"),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Ignoring {key}={value:?}: expected {expected}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    let data_dir = toml::Value::String(default_data_dir());
    format!(
        r#"# Becas Portal Configuration
#
# Environment variables override these settings:
# - BECAS_DATA_DIR
# - BECAS_SEED
# - BECAS_LOG_LEVEL
# - BECAS_LOG_FORMAT

[storage]
# Directory holding one JSON file per collection
data_dir = {data_dir}

[seed]
# Load demo users, calls and applications into empty collections
enabled = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    )
}
