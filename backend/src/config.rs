//! # Application Configuration
//!
//! Settings are read from a single YAML file. The path comes from the
//! `NURTURE_CONFIG` environment variable, falling back to
//! `nurture_config.yaml` inside the default data directory.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_directory: "/home/me/.local/share/nurture"
//! user_scope: "local"
//! server:
//!   host: "127.0.0.1"
//!   port: 3000
//! feeding_reminder_minutes: 45
//! overtired_grace_minutes: 0
//! refresh_interval_secs: 60
//! default_awake_offset_minutes: 120
//! default_baby_age_months: 0
//! ```
//!
//! Every field is optional; a missing file yields the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const CONFIG_ENV_VAR: &str = "NURTURE_CONFIG";
pub const CONFIG_FILE_NAME: &str = "nurture_config.yaml";

/// Upper bound for every minute-valued setting (one day)
pub const MAX_CONFIG_MINUTES: i64 = 24 * 60;
/// Upper bound for the prediction refresh interval (one hour)
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory for the JSON stores
    pub data_directory: PathBuf,
    /// Storage scope for the signed-in user; keys are prefixed with it
    pub user_scope: String,
    pub server: ServerConfig,
    /// Feeding timer reminder threshold
    pub feeding_reminder_minutes: i64,
    /// Extra minutes past the wake window before the baby counts as overtired
    pub overtired_grace_minutes: i64,
    /// How often displayed predictions are refreshed
    pub refresh_interval_secs: u64,
    /// First-launch `lastWakeTime` is this many minutes before now
    pub default_awake_offset_minutes: i64,
    pub default_baby_age_months: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            user_scope: "local".to_string(),
            server: ServerConfig::default(),
            feeding_reminder_minutes: 45,
            overtired_grace_minutes: 0,
            refresh_interval_secs: 60,
            default_awake_offset_minutes: 120,
            default_baby_age_months: 0,
        }
    }
}

impl AppConfig {
    /// Load config from the path named by `NURTURE_CONFIG`, or the default location
    pub fn load() -> Result<Self> {
        let path = match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_data_directory().join(CONFIG_FILE_NAME),
        };
        Self::load_from(&path)
    }

    /// Load config from a YAML file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        debug!("Loaded config from {:?}", path);
        Ok(config.clamped())
    }

    /// Pull every numeric setting into its supported range
    pub fn clamped(mut self) -> Self {
        fn clamp_minutes(name: &str, value: i64, min: i64) -> i64 {
            let clamped = value.clamp(min, MAX_CONFIG_MINUTES);
            if clamped != value {
                warn!("{} = {} is out of range, using {}", name, value, clamped);
            }
            clamped
        }

        self.feeding_reminder_minutes =
            clamp_minutes("feeding_reminder_minutes", self.feeding_reminder_minutes, 1);
        self.overtired_grace_minutes =
            clamp_minutes("overtired_grace_minutes", self.overtired_grace_minutes, 0);
        self.default_awake_offset_minutes =
            clamp_minutes("default_awake_offset_minutes", self.default_awake_offset_minutes, 0);

        let refresh = self.refresh_interval_secs.clamp(1, MAX_REFRESH_INTERVAL_SECS);
        if refresh != self.refresh_interval_secs {
            warn!("refresh_interval_secs = {} is out of range, using {}", self.refresh_interval_secs, refresh);
            self.refresh_interval_secs = refresh;
        }
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .with_context(|| format!("Invalid server address '{}'", addr))
    }
}

fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("nurture")
}
