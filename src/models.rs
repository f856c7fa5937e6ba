use crate::error::ChartError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw row of the consumption table (OECD layout).
///
/// Only `LOCATION`, `SUBJECT` and `Value` are required; the remaining columns
/// are optional so trimmed exports parse as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionRow {
    #[serde(rename = "LOCATION")]
    pub location: String,
    #[serde(rename = "INDICATOR", default)]
    pub indicator: Option<String>,
    #[serde(rename = "SUBJECT")]
    pub subject: String,
    #[serde(rename = "MEASURE", default)]
    pub measure: Option<String>,
    #[serde(rename = "FREQUENCY", default)]
    pub frequency: Option<String>,
    #[serde(rename = "TIME", default)]
    pub time: Option<String>,
    /// Kept as text; parsed during the transform so errors can name the row.
    #[serde(rename = "Value")]
    pub value: String,
}

impl ConsumptionRow {
    /// Convenience constructor for the three columns the transform needs.
    pub fn new(location: &str, subject: &str, value: &str) -> Self {
        Self {
            location: location.into(),
            indicator: None,
            subject: subject.into(),
            measure: None,
            frequency: None,
            time: None,
            value: value.into(),
        }
    }
}

/// Raw row of the country code table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryCodeRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Alpha-3 code")]
    pub alpha3: String,
}

/// One chartable country: its subjects in stacking order and their amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryRecord {
    pub code: String,
    pub name: String,
    pub icon: String,
    pub value: IndexMap<String, f64>,
}

impl CountryRecord {
    pub fn total(&self) -> f64 {
        self.value.values().sum()
    }
}

/// Stacking mode chosen by the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StackMode {
    /// Cumulative stacking per country.
    #[default]
    Stacked,
    /// Each series lifted onto a shared floor above the previous series.
    Separated,
    /// Cumulative stacking normalized to each country's total.
    Percentage,
}

impl StackMode {
    pub const ALL: [StackMode; 3] = [
        StackMode::Stacked,
        StackMode::Separated,
        StackMode::Percentage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StackMode::Stacked => "stacked",
            StackMode::Separated => "separated",
            StackMode::Percentage => "percentage",
        }
    }

    /// Button text shown by the toggle.
    pub fn title(&self) -> &'static str {
        match self {
            StackMode::Stacked => "Stacked",
            StackMode::Separated => "Separated",
            StackMode::Percentage => "Percentage",
        }
    }
}

impl fmt::Display for StackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StackMode {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stacked" => Ok(StackMode::Stacked),
            "separated" => Ok(StackMode::Separated),
            "percentage" => Ok(StackMode::Percentage),
            _ => Err(ChartError::UnknownStackMode(s.to_string())),
        }
    }
}

/// `[lower, upper]` extent of one bar segment in data units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn height(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Intervals of one subject across all countries, in chart country order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSeries {
    pub key: String,
    pub index: usize,
    pub points: Vec<Interval>,
}

impl StackSeries {
    pub fn max_upper(&self) -> Option<f64> {
        self.points.iter().map(|p| p.upper).reduce(f64::max)
    }
}
