//! Chart configuration: geometry, labels, timing, and data-cleaning knobs.
//!
//! Every field has a default, so a JSON file only needs the values it changes:
//!
//! ```
//! let cfg: meatstack_rs::config::ChartConfig =
//!     serde_json::from_str(r#"{ "width": 1200, "duration_ms": 500 }"#).unwrap();
//! assert_eq!(cfg.height, 480.0);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pseudo-codes for world and organization aggregates; not real countries.
pub const DEFAULT_EXCLUDED_CODES: [&str; 3] = ["WLD", "OECD", "BRICS"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 24.0,
            right: 8.0,
            bottom: 48.0,
            left: 48.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub padding_inner: f64,
    pub padding_outer: f64,
    /// Transition length for one bar.
    pub duration_ms: u64,
    /// Extra delay per country index.
    pub stagger_ms: u64,
    pub y_ticks: usize,
    pub icon_dir: String,
    pub count_label: String,
    pub percentage_label: String,
    pub excluded_codes: Vec<String>,
    /// Locale tag for tick labels (`en`, `de`, ...).
    pub locale: String,
    /// TTF used by the plotters export; falls back to system locations.
    pub font_path: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 480.0,
            margin: Margin::default(),
            padding_inner: 0.2,
            padding_outer: 0.1,
            duration_ms: 1000,
            stagger_ms: 50,
            y_ticks: 10,
            icon_dir: "assets/icons".into(),
            count_label: "Kilograms per Capita".into(),
            percentage_label: "Proportion".into(),
            excluded_codes: DEFAULT_EXCLUDED_CODES.iter().map(|c| c.to_string()).collect(),
            locale: "en".into(),
            font_path: None,
        }
    }
}

impl ChartConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    /// Pixel row of the X axis (bottom of the plotting area).
    pub fn baseline_y(&self) -> f64 {
        self.height - self.margin.bottom
    }
}

/// Read a config from a JSON file; absent fields keep their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ChartConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
