use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the key-value storage file, drafts, submissions and logs
    pub state: String,
}

/// Mock authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Storage key under which the authentication marker is kept
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Minimum password length accepted by local validation
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Simulated sign-in latency in milliseconds (default: 800)
    #[serde(default = "default_login_latency")]
    pub login_latency_ms: u64,
}

fn default_storage_key() -> String {
    "civic.auth".to_string()
}

fn default_min_password_length() -> usize {
    8
}

fn default_login_latency() -> u64 {
    800
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            min_password_length: default_min_password_length(),
            login_latency_ms: default_login_latency(),
        }
    }
}

impl AuthConfig {
    pub fn login_latency(&self) -> Duration {
        Duration::from_millis(self.login_latency_ms)
    }
}

/// Onboarding wizard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Save step answers as drafts when leaving a step (false = local state only)
    #[serde(default = "default_persist_drafts")]
    pub persist_drafts: bool,
}

fn default_persist_drafts() -> bool {
    true
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            persist_drafts: default_persist_drafts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    /// Rows per page in dashboard lists
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Path to the project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".civic/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so civic works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let project_config = Self::project_config_path();
        if project_config.exists() {
            builder = builder.add_source(config::File::from(project_config));
        }

        // User config in ~/.config/civic/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("civic").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // CIVIC_<SECTION>__<KEY>, e.g. CIVIC_AUTH__LOGIN_LATENCY_MS
        builder = builder.add_source(
            config::Environment::with_prefix("CIVIC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// File backing the key-value store
    pub fn storage_file(&self) -> PathBuf {
        self.state_path().join("storage.json")
    }

    /// Directory receiving finished onboarding submissions
    pub fn submissions_path(&self) -> PathBuf {
        self.state_path().join("submissions")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                state: ".civic".to_string(), // Relative to cwd
            },
            auth: AuthConfig::default(),
            wizard: WizardConfig::default(),
            ui: UiConfig {
                refresh_rate_ms: 250,
                page_size: default_page_size(),
            },
            logging: LoggingConfig::default(),
        }
    }
}
