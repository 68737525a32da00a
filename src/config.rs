use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "launch-dash")]
#[command(about = "Launch records dashboard: outcome breakdown and payload vs. outcome scatter")]
#[command(version)]
pub struct Cli {
    /// Launch records file (.csv, .json or .parquet); overrides the config file
    pub dataset: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, env = "LAUNCH_DASH_CONFIG")]
    pub config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Start-up settings.  Every field has a default, so a config file only
/// needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashConfig {
    /// Dataset loaded at start-up; failure to load it is fatal.
    pub dataset: PathBuf,
    /// Payload slider step in kg; also rounds the range ceiling up.
    pub slider_step: f64,
    pub window_size: [f32; 2],
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("spacex_launch_dash.csv"),
            slider_step: 1000.0,
            window_size: [1200.0, 800.0],
        }
    }
}

impl DashConfig {
    /// Defaults, then the config file (`--config` or `LAUNCH_DASH_CONFIG`),
    /// then the positional dataset path.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(dataset) = &cli.dataset {
            config.dataset = dataset.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.slider_step.is_finite() && self.slider_step >= 0.0,
            "slider_step must be a non-negative number, got {}",
            self.slider_step
        );
        Ok(())
    }
}
