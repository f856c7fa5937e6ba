//! meatstack_rs
//!
//! A small Rust library for turning per-country meat-consumption tables into
//! stacked bar charts. Pairs with the `meatstack` CLI and the `meatstack-gui`
//! desktop app.
//!
//! ### Features
//! - Load the OECD consumption CSV and an ISO country-code CSV
//! - Reshape rows into one record per country (aggregates like `WLD` dropped)
//! - Stacked, separated, and percentage layouts
//! - Animated SVG, HTML page with a stacking toggle, or static PNG/SVG charts
//! - Quick per-subject summary statistics
//!
//! ### Example
//! ```no_run
//! use meatstack_rs::{storage, transform, viz, ChartConfig, StackMode, StackedBarChart};
//!
//! let cfg = ChartConfig::default();
//! let rows = storage::load_consumption_csv("assets/data/meat-consumption.csv")?;
//! let codes = storage::load_country_codes_csv("assets/data/country-codes.csv")?;
//! let names = transform::CountryNames::from_rows(&codes);
//! let records = transform::process_data(
//!     &rows,
//!     &names,
//!     &cfg.excluded_codes,
//!     &transform::RowFilter::default(),
//!     &cfg.icon_dir,
//! )?;
//! let mut chart = StackedBarChart::new(records, &cfg.count_label, &cfg.percentage_label, cfg.clone())?;
//! let state = chart.on_stack_change(StackMode::Stacked).clone();
//! let svg = viz::svg::render_scene(&chart.scene(&state), viz::svg::Start::Baseline);
//! std::fs::write("chart.svg", svg)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod models;
pub mod scale;
pub mod stack;
pub mod stats;
pub mod storage;
pub mod toggle;
pub mod transform;
pub mod transition;
pub mod viz;

pub use chart::{RenderState, Scene, StackedBarChart};
pub use config::ChartConfig;
pub use error::ChartError;
pub use models::{CountryRecord, StackMode};
