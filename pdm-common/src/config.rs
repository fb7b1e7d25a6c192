//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (and their `PDM_*` environment fallbacks)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! The config file itself is located by `--config`, then the `PDM_CONFIG`
//! environment variable, then `<config dir>/pdm/pdm-web.toml` if it exists.
//! A missing default file is not an error; the service starts on defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "PDM_CONFIG";

/// Settings as they appear in the TOML file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Directory holding uploaded and generated CSV files
    pub upload_dir: Option<PathBuf>,
    /// Column dropped from uploads before prediction; "" disables dropping
    pub identifier_column: Option<String>,
    pub max_upload_bytes: Option<usize>,
    pub predict: PredictConfig,
    pub models: ModelsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictConfig {
    /// Redirect successful single predictions to the dashboard page
    pub dashboard: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    /// Binary maintenance model (single-record flow)
    pub maintenance: Option<PathBuf>,
    /// Six-way failure-type model (batch flow)
    pub failure_type: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
}

/// Built-in defaults used when neither CLI nor TOML provide a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub identifier_column: String,
    pub max_upload_bytes: usize,
    pub dashboard: bool,
    pub maintenance_model: PathBuf,
    pub failure_type_model: PathBuf,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            identifier_column: "UDI".to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            dashboard: true,
            maintenance_model: PathBuf::from("models/maintenance.onnx"),
            failure_type_model: PathBuf::from("models/failure_type.onnx"),
            log_level: "info".to_string(),
        }
    }
}

/// Command-line overrides (highest priority)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_dir: Option<PathBuf>,
    pub identifier_column: Option<String>,
    pub dashboard: Option<bool>,
    pub maintenance_model: Option<PathBuf>,
    pub failure_type_model: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    /// `None` when identifier dropping is disabled
    pub identifier_column: Option<String>,
    pub max_upload_bytes: usize,
    pub dashboard: bool,
    pub maintenance_model: PathBuf,
    pub failure_type_model: PathBuf,
    pub log_level: String,
}

impl ServerConfig {
    /// Merge overrides, TOML values and compiled defaults
    pub fn resolve(toml: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let identifier_column = overrides
            .identifier_column
            .or(toml.identifier_column)
            .unwrap_or(defaults.identifier_column);
        let identifier_column = match identifier_column.trim() {
            "" => None,
            name => Some(name.to_string()),
        };

        let max_upload_bytes = toml.max_upload_bytes.unwrap_or(defaults.max_upload_bytes);
        if max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than 0".to_string()));
        }

        Ok(Self {
            host: overrides.host.or(toml.host).unwrap_or(defaults.host),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            upload_dir: overrides.upload_dir.or(toml.upload_dir).unwrap_or(defaults.upload_dir),
            identifier_column,
            max_upload_bytes,
            dashboard: overrides.dashboard.or(toml.predict.dashboard).unwrap_or(defaults.dashboard),
            maintenance_model: overrides
                .maintenance_model
                .or(toml.models.maintenance)
                .unwrap_or(defaults.maintenance_model),
            failure_type_model: overrides
                .failure_type_model
                .or(toml.models.failure_type)
                .unwrap_or(defaults.failure_type_model),
            log_level: overrides.log_level.or(toml.logging.level).unwrap_or(defaults.log_level),
        })
    }

    /// Locate and read the config file, then resolve against overrides
    ///
    /// An explicitly named file (CLI or environment) must exist; the
    /// per-user default file is optional. Returns where the file settings
    /// came from so the caller can log it once tracing is up.
    pub fn load(cli_config: Option<&Path>, overrides: ConfigOverrides) -> Result<(Self, ConfigSource)> {
        let (toml, source) = match resolve_config_path(cli_config) {
            ConfigLocation::Explicit(path) => (load_toml(&path)?, ConfigSource::File(path)),
            ConfigLocation::Default(path) if path.exists() => {
                (load_toml(&path)?, ConfigSource::File(path))
            }
            ConfigLocation::Default(path) => (TomlConfig::default(), ConfigSource::Defaults(Some(path))),
            ConfigLocation::None => (TomlConfig::default(), ConfigSource::Defaults(None)),
        };
        Ok((Self::resolve(toml, overrides)?, source))
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Origin of the file-level settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file read; carries the default location that was probed
    Defaults(Option<PathBuf>),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults(Some(path)) => {
                write!(f, "compiled defaults (no file at {})", path.display())
            }
            ConfigSource::Defaults(None) => write!(f, "compiled defaults"),
        }
    }
}

/// Where the config file was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Named on the command line or via `PDM_CONFIG`
    Explicit(PathBuf),
    /// Per-user default location (may not exist)
    Default(PathBuf),
    None,
}

/// Resolve the config file location: CLI, then environment, then default
pub fn resolve_config_path(cli_arg: Option<&Path>) -> ConfigLocation {
    if let Some(path) = cli_arg {
        return ConfigLocation::Explicit(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return ConfigLocation::Explicit(PathBuf::from(path));
        }
    }
    match dirs::config_dir() {
        Some(dir) => ConfigLocation::Default(dir.join("pdm").join("pdm-web.toml")),
        None => ConfigLocation::None,
    }
}

/// Read and parse a TOML config file
pub fn load_toml(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse TOML {}: {}", path.display(), e)))
}
