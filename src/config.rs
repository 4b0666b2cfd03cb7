use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::notify::NOTIFICATION_TITLE;
use crate::service::DEFAULT_TICK_INTERVAL_MS;

pub const ENV_CONFIG: &str = "RUNWATCH_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Nominal milliseconds between stopwatch ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Notification title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Skip the desktop notification service and log elapsed time instead.
    #[serde(default)]
    pub log_only: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            title: default_title(),
            log_only: false,
        }
    }
}

fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_title() -> String {
    NOTIFICATION_TITLE.to_string()
}

impl AgentConfig {
    /// Resolves and loads the config. An explicitly given path (flag or env)
    /// must load; a missing file at the XDG default path means defaults.
    pub fn find_and_load(
        cli_value: Option<PathBuf>,
    ) -> Result<(Option<PathBuf>, AgentConfig), AppError> {
        if let Some(path) = explicit_config_path(cli_value) {
            let cfg = load_config(&path)?;
            return Ok((Some(path), cfg));
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                let cfg = load_config(&path)?;
                Ok((Some(path), cfg))
            }
            _ => Ok((None, AgentConfig::default())),
        }
    }
}

fn explicit_config_path(cli_value: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_value {
        return Some(p);
    }
    std::env::var(ENV_CONFIG).ok().map(PathBuf::from)
}

pub fn default_config_path() -> Option<PathBuf> {
    let pd = ProjectDirs::from("dev", "runwatch", "runwatch")?;
    Some(pd.config_dir().join("agent.yaml"))
}

pub fn load_config(path: &PathBuf) -> Result<AgentConfig, AppError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("read {} failed: {e}", path.display())))?;
    let cfg: AgentConfig = serde_yaml::from_str(&data)
        .map_err(|e| AppError::Config(format!("parse {} failed: {e}", path.display())))?;
    Ok(cfg)
}
