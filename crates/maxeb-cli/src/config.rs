//! Configuration file management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use maxeb_types::SimulationInput;

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default calculator inputs.
    #[serde(default)]
    pub calculation: CalculationConfig,
    /// Rendering and logging.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default calculator inputs, used when no flag overrides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Total ETH to stake.
    #[serde(default = "default_total_stake")]
    pub total_stake: f64,
    /// Network APR in percent.
    #[serde(default = "default_network_apr")]
    pub network_apr: f64,
    /// Horizon in years.
    #[serde(default = "default_years")]
    pub years: u32,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "text" | "json".
    #[serde(default = "default_format")]
    pub format: String,
    /// Include stage snapshots in the output.
    #[serde(default)]
    pub trace: bool,
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_total_stake() -> f64 {
    SimulationInput::default().total_stake
}

fn default_network_apr() -> f64 {
    SimulationInput::default().network_apr
}

fn default_years() -> u32 {
    SimulationInput::default().years
}

fn default_format() -> String {
    "text".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            total_stake: default_total_stake(),
            network_apr: default_network_apr(),
            years: default_years(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            trace: false,
            log_level: default_log_level(),
        }
    }
}

impl CalculationConfig {
    pub fn to_input(&self) -> SimulationInput {
        SimulationInput {
            total_stake: self.total_stake,
            network_apr: self.network_apr,
            years: self.years,
        }
    }
}

impl CliConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: CliConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Whether JSON output was requested.
    pub fn json_output(&self) -> bool {
        self.output.format.eq_ignore_ascii_case("json")
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        // Check env var override first
        if let Ok(path) = std::env::var("MAXEB_CONFIG") {
            return PathBuf::from(path);
        }
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".maxeb"))
            .unwrap_or_else(|_| PathBuf::from(".maxeb"))
            .join("config.toml")
    }
}
