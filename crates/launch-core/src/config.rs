//! Launcher settings.
//!
//! Defaults are overridden by an optional TOML file, then by `TV_LAUNCHER_*`
//! environment variables. The base address is kept as written apart from
//! surrounding whitespace.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_ADDRESS: &str = "https://www.youtube.com/tv";
pub const DEFAULT_TARGET_APP_ID: &str = "org.tizen.browser";
pub const APP_CONTROL_OPERATION_VIEW: &str = "http://tizen.org/appcontrol/operation/view";

pub const DEFAULT_WARMUP_INITIAL_MS: u64 = 3_000;
pub const DEFAULT_WARMUP_SETTLE_MS: u64 = 1_000;
pub const DEFAULT_DISMISS_DELAY_MS: u64 = 2_000;
pub const DEFAULT_FADE_OUT_MS: u64 = 500;
pub const DEFAULT_LAUNCH_TIMEOUT_MS: u64 = 30_000;

pub const ENV_BASE_ADDRESS: &str = "TV_LAUNCHER_BASE_ADDRESS";
pub const ENV_TARGET_APP_ID: &str = "TV_LAUNCHER_TARGET_APP_ID";
pub const ENV_APP_CONTROL_OPERATION: &str = "TV_LAUNCHER_APP_CONTROL_OPERATION";
pub const ENV_WARMUP_INITIAL_MS: &str = "TV_LAUNCHER_WARMUP_INITIAL_MS";
pub const ENV_WARMUP_SETTLE_MS: &str = "TV_LAUNCHER_WARMUP_SETTLE_MS";
pub const ENV_DISMISS_DELAY_MS: &str = "TV_LAUNCHER_DISMISS_DELAY_MS";
pub const ENV_FADE_OUT_MS: &str = "TV_LAUNCHER_FADE_OUT_MS";
pub const ENV_LAUNCH_TIMEOUT_MS: &str = "TV_LAUNCHER_LAUNCH_TIMEOUT_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("base address must use http:// or https:// and include a host, got {0:?}")]
    InvalidBaseAddress(String),
    #[error("target app id must not be empty")]
    EmptyTargetAppId,
    #[error("app-control operation must not be empty")]
    EmptyOperation,
    #[error("invalid {key}: {value:?} is not a millisecond count")]
    InvalidMillis { key: &'static str, value: String },
}

/// Launcher timings and target identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub base_address: String,
    pub target_app_id: String,
    pub app_control_operation: String,
    pub warmup_initial: Duration,
    pub warmup_settle: Duration,
    pub dismiss_delay: Duration,
    pub fade_out: Duration,
    /// `None` waits for the host callback forever.
    pub launch_timeout: Option<Duration>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDRESS.to_string(),
            target_app_id: DEFAULT_TARGET_APP_ID.to_string(),
            app_control_operation: APP_CONTROL_OPERATION_VIEW.to_string(),
            warmup_initial: Duration::from_millis(DEFAULT_WARMUP_INITIAL_MS),
            warmup_settle: Duration::from_millis(DEFAULT_WARMUP_SETTLE_MS),
            dismiss_delay: Duration::from_millis(DEFAULT_DISMISS_DELAY_MS),
            fade_out: Duration::from_millis(DEFAULT_FADE_OUT_MS),
            launch_timeout: Some(Duration::from_millis(DEFAULT_LAUNCH_TIMEOUT_MS)),
        }
    }
}

/// On-disk overrides. Every field is optional; durations are milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_address: Option<String>,
    target_app_id: Option<String>,
    app_control_operation: Option<String>,
    warmup_initial_ms: Option<u64>,
    warmup_settle_ms: Option<u64>,
    dismiss_delay_ms: Option<u64>,
    fade_out_ms: Option<u64>,
    launch_timeout_ms: Option<u64>,
}

impl LauncherConfig {
    /// Defaults, then the optional file, then `TV_LAUNCHER_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };
        config.apply_env()
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        let mut config = Self::default();
        if let Some(base_address) = file.base_address {
            config.base_address = base_address;
        }
        if let Some(target_app_id) = file.target_app_id {
            config.target_app_id = target_app_id;
        }
        if let Some(operation) = file.app_control_operation {
            config.app_control_operation = operation;
        }
        if let Some(ms) = file.warmup_initial_ms {
            config.warmup_initial = Duration::from_millis(ms);
        }
        if let Some(ms) = file.warmup_settle_ms {
            config.warmup_settle = Duration::from_millis(ms);
        }
        if let Some(ms) = file.dismiss_delay_ms {
            config.dismiss_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.fade_out_ms {
            config.fade_out = Duration::from_millis(ms);
        }
        if let Some(ms) = file.launch_timeout_ms {
            config.launch_timeout = timeout_from_millis(ms);
        }
        config.validated()
    }

    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; blank values are ignored.
    pub fn apply_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(base_address) = lookup(ENV_BASE_ADDRESS) {
            self.base_address = base_address;
        }
        if let Some(target_app_id) = lookup(ENV_TARGET_APP_ID) {
            self.target_app_id = target_app_id;
        }
        if let Some(operation) = lookup(ENV_APP_CONTROL_OPERATION) {
            self.app_control_operation = operation;
        }
        if let Some(raw) = lookup(ENV_WARMUP_INITIAL_MS) {
            self.warmup_initial = Duration::from_millis(parse_millis(ENV_WARMUP_INITIAL_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_WARMUP_SETTLE_MS) {
            self.warmup_settle = Duration::from_millis(parse_millis(ENV_WARMUP_SETTLE_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_DISMISS_DELAY_MS) {
            self.dismiss_delay = Duration::from_millis(parse_millis(ENV_DISMISS_DELAY_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_FADE_OUT_MS) {
            self.fade_out = Duration::from_millis(parse_millis(ENV_FADE_OUT_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_LAUNCH_TIMEOUT_MS) {
            self.launch_timeout = timeout_from_millis(parse_millis(ENV_LAUNCH_TIMEOUT_MS, &raw)?);
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.base_address = normalize_base_address(&self.base_address)?;
        self.target_app_id = self.target_app_id.trim().to_string();
        if self.target_app_id.is_empty() {
            return Err(ConfigError::EmptyTargetAppId);
        }
        self.app_control_operation = self.app_control_operation.trim().to_string();
        if self.app_control_operation.is_empty() {
            return Err(ConfigError::EmptyOperation);
        }
        Ok(self)
    }
}

pub fn normalize_base_address(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = || ConfigError::InvalidBaseAddress(raw.to_string());
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(invalid());
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(invalid());
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

fn parse_millis(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|_| ConfigError::InvalidMillis {
        key,
        value: raw.to_string(),
    })
}

// Zero disables the launch timeout.
fn timeout_from_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
