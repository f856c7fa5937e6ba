//! Stacked bar chart state and scene construction.
//!
//! The chart owns what never changes after construction (sorted records,
//! subject keys, the X scale, geometry). Each mode change produces a fresh
//! [`RenderState`] through the pure [`wrangle`] function, and [`StackedBarChart::scene`]
//! turns that state into a renderer-agnostic [`Scene`].
//!
//! ```
//! use indexmap::IndexMap;
//! use meatstack_rs::chart::StackedBarChart;
//! use meatstack_rs::config::ChartConfig;
//! use meatstack_rs::models::{CountryRecord, StackMode};
//!
//! let mut value = IndexMap::new();
//! value.insert("beef".to_string(), 10.0);
//! let recs = vec![CountryRecord { code: "AAA".into(), name: "A".into(), icon: "a.svg".into(), value }];
//! let mut chart = StackedBarChart::new(recs, "kg", "share", ChartConfig::default())?;
//! let state = chart.on_stack_change(StackMode::Stacked).clone();
//! let scene = chart.scene(&state);
//! assert_eq!(scene.bars.len(), 1);
//! # Ok::<(), meatstack_rs::error::ChartError>(())
//! ```

use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::models::{CountryRecord, StackMode, StackSeries};
use crate::scale::{BandScale, LinearScale};
use crate::stack::{max_upper, stack_layout};
use crate::transform::subject_keys_consistent;
use crate::viz::util::map_locale;
use serde::Serialize;
use std::time::Duration;

/// Everything derived from one mode change.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub mode: StackMode,
    pub y_label: String,
    pub series: Vec<StackSeries>,
    pub y: LinearScale,
}

/// Category tick on the X axis with the icon drawn below it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XTick {
    pub code: String,
    pub name: String,
    /// Tick centre in canvas pixels.
    pub x: f64,
    pub icon: String,
    /// Icon box relative to the tick: `(x, y, size)`.
    pub icon_box: (f64, f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YTick {
    pub value: f64,
    pub y: f64,
    pub label: String,
}

/// One rectangle per (subject, country).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarGeom {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BarGeom {
    /// Collapsed bar sitting on the baseline, where entering bars start.
    pub fn collapsed(x: f64, width: f64, baseline_y: f64) -> Self {
        Self {
            x,
            y: baseline_y,
            width,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneBar {
    pub key: String,
    pub series_index: usize,
    pub country_index: usize,
    pub code: String,
    pub value: f64,
    pub geom: BarGeom,
    pub delay: Duration,
}

/// Renderer-agnostic picture of the chart for one mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub mode: StackMode,
    pub width: f64,
    pub height: f64,
    /// Pixel row of the X axis.
    pub baseline_y: f64,
    /// Pixel column of the Y axis.
    pub axis_x: f64,
    pub keys: Vec<String>,
    pub x_ticks: Vec<XTick>,
    pub y_ticks: Vec<YTick>,
    pub y_title: String,
    /// Title anchor in canvas pixels.
    pub y_title_pos: (f64, f64),
    pub bars: Vec<SceneBar>,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct StackedBarChart {
    config: ChartConfig,
    records: Vec<CountryRecord>,
    keys: Vec<String>,
    count_label: String,
    percentage_label: String,
    x: BandScale,
    state: Option<RenderState>,
}

impl StackedBarChart {
    /// Sort records by descending total and fix the X scale.
    pub fn new(
        records: Vec<CountryRecord>,
        count_label: &str,
        percentage_label: &str,
        config: ChartConfig,
    ) -> Result<Self, ChartError> {
        if records.is_empty() {
            return Err(ChartError::EmptyDataset);
        }
        if !subject_keys_consistent(&records) {
            log::warn!("subject keys differ between countries; missing subjects stack as 0");
        }
        let mut records = records;
        // Stable sort: equal totals keep their load order.
        records.sort_by(|a, b| b.total().total_cmp(&a.total()));
        let keys: Vec<String> = records[0].value.keys().cloned().collect();
        let x = BandScale::new(
            records.iter().map(|r| r.code.clone()).collect(),
            (config.margin.left, config.width - config.margin.right),
            config.padding_inner,
            config.padding_outer,
        );
        Ok(Self {
            config,
            records,
            keys,
            count_label: count_label.to_string(),
            percentage_label: percentage_label.to_string(),
            x,
            state: None,
        })
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn x_scale(&self) -> &BandScale {
        &self.x
    }

    /// Current state, `None` before the first mode change.
    pub fn state(&self) -> Option<&RenderState> {
        self.state.as_ref()
    }

    pub fn y_label_for(&self, mode: StackMode) -> &str {
        match mode {
            StackMode::Stacked | StackMode::Separated => &self.count_label,
            StackMode::Percentage => &self.percentage_label,
        }
    }

    /// Layout for `mode` without touching the current state.
    pub fn layout_for(&self, mode: StackMode) -> RenderState {
        wrangle(
            &self.records,
            &self.keys,
            mode,
            self.y_label_for(mode),
            &self.config,
        )
    }

    /// Switch the stacking mode and recompute the layout.
    pub fn on_stack_change(&mut self, mode: StackMode) -> &RenderState {
        let state = self.layout_for(mode);
        self.state.insert(state)
    }

    /// Build the drawable scene for `state`.
    pub fn scene(&self, state: &RenderState) -> Scene {
        let cfg = &self.config;
        let bw = self.x.bandwidth();
        let (locale, _) = map_locale(&cfg.locale);

        let x_ticks = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| XTick {
                code: r.code.clone(),
                name: r.name.clone(),
                x: self.x.center_at(i),
                icon: r.icon.clone(),
                icon_box: (-bw / 2.0, 20.0, bw),
            })
            .collect();

        let fmt = state.y.tick_format(cfg.y_ticks, locale);
        let y_ticks = state
            .y
            .ticks(cfg.y_ticks)
            .into_iter()
            .map(|value| YTick {
                value,
                y: state.y.apply(value),
                label: fmt(value),
            })
            .collect();

        let mut bars = Vec::with_capacity(state.series.len() * self.records.len());
        for s in &state.series {
            for (ci, (p, r)) in s.points.iter().zip(&self.records).enumerate() {
                let top = state.y.apply(p.upper);
                let bottom = state.y.apply(p.lower);
                bars.push(SceneBar {
                    key: s.key.clone(),
                    series_index: s.index,
                    country_index: ci,
                    code: r.code.clone(),
                    value: r.value.get(&s.key).copied().unwrap_or(0.0),
                    geom: BarGeom {
                        x: self.x.at(ci),
                        y: top,
                        width: bw,
                        height: bottom - top,
                    },
                    delay: cfg.stagger() * ci as u32,
                });
            }
        }

        Scene {
            mode: state.mode,
            width: cfg.width,
            height: cfg.height,
            baseline_y: cfg.baseline_y(),
            axis_x: cfg.margin.left,
            keys: self.keys.clone(),
            x_ticks,
            y_ticks,
            y_title: state.y_label.clone(),
            y_title_pos: (0.0, cfg.margin.top - 12.0),
            bars,
            duration: cfg.duration(),
        }
    }

    /// Scene for the current state, if a mode was selected.
    pub fn current_scene(&self) -> Option<Scene> {
        self.state.as_ref().map(|s| self.scene(s))
    }
}

/// Pure layout step: series for `mode` plus the fitted Y scale.
pub fn wrangle(
    records: &[CountryRecord],
    keys: &[String],
    mode: StackMode,
    y_label: &str,
    config: &ChartConfig,
) -> RenderState {
    let series = stack_layout(records, keys, mode);
    let top = max_upper(&series).filter(|m| *m > 0.0).unwrap_or(1.0);
    let y = LinearScale::new((0.0, top), (config.baseline_y(), config.margin.top));
    log::debug!("{mode} layout: {} series, y domain [0, {top}]", series.len());
    RenderState {
        mode,
        y_label: y_label.to_string(),
        series,
        y,
    }
}
