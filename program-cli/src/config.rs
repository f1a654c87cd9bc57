//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use program_engine::{EngineConfig, ExecutionStatus};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Spaces per nesting level
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    /// Prefix drawn in front of highlighted rows
    #[serde(default = "default_highlight_marker")]
    pub highlight_marker: String,
}

fn default_indent_width() -> usize {
    4
}

fn default_highlight_marker() -> String {
    "▶".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            highlight_marker: default_highlight_marker(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Position of the event to select before running (default: keep the loaded selection)
    pub select_event: Option<usize>,
    /// Interpreter snapshots, one per poll tick
    #[serde(default)]
    pub snapshots: Vec<SnapshotConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub running: Vec<RunningEventConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunningEventConfig {
    /// Event position in the list
    pub event: usize,
    /// Command positions executed so far, in order
    #[serde(default)]
    pub commands: Vec<usize>,
}

impl SnapshotConfig {
    /// Convert to the status map the engine polls
    pub fn to_status(&self) -> ExecutionStatus {
        self.running
            .iter()
            .map(|r| (r.event, r.commands.clone()))
            .collect()
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate(&config).with_context(|| format!("Invalid config file: {:?}", path))?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.engine.poll_interval_ms == 0 {
        bail!("engine.poll_interval_ms must be greater than zero");
    }
    if config.display.indent_width == 0 {
        bail!("display.indent_width must be greater than zero");
    }
    Ok(())
}
