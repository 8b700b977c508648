//! Configuration management for Veil.
//!
//! Parses `veil.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `gate.default_credential`
//! - `memo.dir`
//! - `memo.session`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the default credential for `{{encrypted:...}}` blocks.
    pub default_credential: Option<String>,
    /// Override the session memo backend.
    pub memo_backend: Option<MemoBackend>,
    /// Override the session memo directory.
    pub memo_dir: Option<PathBuf>,
    /// Override the session id.
    pub session: Option<String>,
    /// Override whether editing the credential clears the error message.
    pub clear_error_on_input: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "veil.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gate behavior.
    pub gate: GateConfig,
    /// Session memo configuration (paths are relative strings from TOML).
    memo: MemoConfigRaw,
    /// User-facing strings of the gated views.
    pub messages: Messages,

    /// Resolved memo configuration (set after loading).
    #[serde(skip)]
    pub memo_resolved: MemoConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Gate configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Credential for blocks using the `{{encrypted:...}}` form.
    ///
    /// There is deliberately no built-in value.
    pub default_credential: Option<String>,
    /// Clear a pending "incorrect credential" message as soon as the input changes.
    pub clear_error_on_input: bool,
}

/// Session memo storage medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoBackend {
    /// Memoization disabled.
    None,
    /// Process memory, lost when the process exits.
    Memory,
    /// Files under `memo.dir`, kept until the session id changes.
    #[default]
    File,
}

/// Raw memo configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct MemoConfigRaw {
    backend: Option<MemoBackend>,
    dir: Option<String>,
    session: Option<String>,
}

/// Resolved memo configuration with absolute paths.
#[derive(Debug)]
pub struct MemoConfig {
    /// Storage medium.
    pub backend: MemoBackend,
    /// Directory of the file backend.
    pub dir: PathBuf,
    /// Session id owning the stored entries.
    pub session: String,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            backend: MemoBackend::default(),
            dir: PathBuf::from(".veil/session"),
            session: DEFAULT_SESSION.to_owned(),
        }
    }
}

const DEFAULT_SESSION: &str = "default";

/// User-facing strings of the gated views.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Messages {
    /// Shown after a failed comparison.
    pub incorrect_credential: String,
    /// Label above the credential input.
    pub locked_label: String,
    /// Placeholder of the credential input.
    pub placeholder: String,
    /// Caption of the submit button.
    pub unlock: String,
    /// Placeholder rendered before the environment is ready.
    pub loading: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            incorrect_credential: "Incorrect password".to_owned(),
            locked_label: "Encrypted content".to_owned(),
            placeholder: "Enter password to view".to_owned(),
            unlock: "Unlock".to_owned(),
            loading: "Loading...".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`gate.default_credential`").
        field: String,
        /// Error message (e.g., "${`VEIL_DEFAULT_CREDENTIAL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `veil.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(credential) = &settings.default_credential {
            self.gate.default_credential = Some(credential.clone());
        }
        if let Some(clear) = settings.clear_error_on_input {
            self.gate.clear_error_on_input = clear;
        }
        if let Some(backend) = settings.memo_backend {
            self.memo_resolved.backend = backend;
        }
        if let Some(dir) = &settings.memo_dir {
            self.memo_resolved.dir.clone_from(dir);
        }
        if let Some(session) = &settings.session {
            self.memo_resolved.session.clone_from(session);
        }
    }

    /// Get the validated default credential.
    ///
    /// Use this instead of reading `gate.default_credential` directly when a
    /// page contains `{{encrypted:...}}` blocks.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the credential is unset or empty.
    pub fn require_default_credential(&self) -> Result<&str, ConfigError> {
        let credential = self.gate.default_credential.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "gate.default_credential is required for {{encrypted:...}} blocks".to_owned(),
            )
        })?;
        require_non_empty(credential, "gate.default_credential")?;
        Ok(credential)
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            gate: GateConfig::default(),
            memo: MemoConfigRaw::default(),
            messages: Messages::default(),
            memo_resolved: MemoConfig {
                dir: base.join(".veil").join("session"),
                ..MemoConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(credential) = &self.gate.default_credential {
            require_non_empty(credential, "gate.default_credential")?;
        }
        require_non_empty(&self.memo_resolved.session, "memo.session")?;
        require_non_empty(
            &self.messages.incorrect_credential,
            "messages.incorrect_credential",
        )?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref credential) = self.gate.default_credential {
            self.gate.default_credential =
                Some(expand::expand_env(credential, "gate.default_credential")?);
        }
        if let Some(ref dir) = self.memo.dir {
            self.memo.dir = Some(expand::expand_env(dir, "memo.dir")?);
        }
        if let Some(ref session) = self.memo.session {
            self.memo.session = Some(expand::expand_env(session, "memo.session")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.memo_resolved = MemoConfig {
            backend: self.memo.backend.unwrap_or_default(),
            dir: config_dir.join(self.memo.dir.as_deref().unwrap_or(".veil/session")),
            session: self
                .memo
                .session
                .clone()
                .unwrap_or_else(|| DEFAULT_SESSION.to_owned()),
        };
    }
}

/// Search for a config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
