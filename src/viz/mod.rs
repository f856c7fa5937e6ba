//! Visualization: render chart scenes to **SVG**, **HTML**, or **PNG**.
//!
//! - [`svg`]: animated scene SVG (axes, icons, SMIL bar transitions)
//! - [`page`]: HTML page with the stacking toggle and one chart per mode
//! - [`plot_stacked`]: static chart through plotters (PNG or SVG)
//! - [`icon`]: country icons rasterized for the desktop viewer
//! - Distinct subject colors (Microsoft Office palette)
//! - Locale-aware tick labels (`30,000` vs `30.000`)

pub mod icon;
pub mod page;
pub mod style;
pub mod svg;
pub mod text;
pub mod types;
pub mod util;

pub use types::OutputKind;

use crate::chart::{RenderState, StackedBarChart};
use crate::error::ChartError;
use anyhow::{Context, Result};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use style::{SeriesStyle, fill_style};
use text::{estimate_text_width_px, truncate_to_width};
use util::map_locale;

/// Well-known font locations tried when no font path is configured.
const FONT_CANDIDATES: &[&str] = &[
    "assets/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED_FONT: OnceLock<PathBuf> = OnceLock::new();

/// First existing font file: the configured one, else a well-known location.
pub fn find_font(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = configured {
        return p.is_file().then(|| p.to_path_buf());
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Register a "sans-serif" font for the `ab_glyph` text path, once per process.
/// Required because `ab_glyph` doesn't discover OS fonts.
fn ensure_fonts_registered(configured: Option<&Path>) -> Result<(), ChartError> {
    if REGISTERED_FONT.get().is_some() {
        return Ok(());
    }
    let path = find_font(configured).ok_or_else(|| {
        ChartError::Font("no TTF found; set `font_path` in the config or pass --font".into())
    })?;
    let bytes = fs::read(&path).map_err(|e| ChartError::Font(format!("{}: {e}", path.display())))?;
    // plotters keeps a 'static reference for the life of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| ChartError::Font(format!("{}: not a valid font file", path.display())))?;
    log::debug!("registered font {}", path.display());
    let _ = REGISTERED_FONT.set(path);
    Ok(())
}

/// Draw `state` as a static stacked bar chart. `.svg` paths use the SVG
/// backend, everything else the bitmap backend.
pub fn plot_stacked<P: AsRef<Path>>(
    chart: &StackedBarChart,
    state: &RenderState,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_fonts_registered(chart.config().font_path.as_deref())?;
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    let drawn = if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, chart, state)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, chart, state)
    };
    drawn.with_context(|| format!("drawing {}", out_path.display()))?;
    log::info!("wrote {} chart to {}", state.mode, out_path.display());
    Ok(())
}

fn backend_err<E: std::fmt::Debug>(e: E) -> ChartError {
    ChartError::Render(format!("{e:?}"))
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    chart: &StackedBarChart,
    state: &RenderState,
) -> Result<(), ChartError>
where
    DB: DrawingBackend,
{
    const MARGIN: u32 = 16;
    const LEGEND_H: u32 = 32;
    const FONT_PX: u32 = 12;

    let cfg = chart.config();
    let codes: Vec<String> = chart.records().iter().map(|r| r.code.clone()).collect();
    let n = codes.len() as i32;
    let (locale, _) = map_locale(&cfg.locale);
    let y_fmt = state.y.tick_format(cfg.y_ticks, locale);
    let y_max = state.y.domain.1;

    root.fill(&WHITE).map_err(backend_err)?;
    let (legend_area, plot_area) = root.split_vertically(LEGEND_H as i32);

    // Legend: one swatch + name per subject, left to right.
    let (legend_w, _) = legend_area.dim_in_pixel();
    let slot = (legend_w.saturating_sub(2 * MARGIN) / chart.keys().len().max(1) as u32).max(24);
    for (i, key) in chart.keys().iter().enumerate() {
        let style = SeriesStyle::for_subject(key, i);
        let x = (MARGIN + slot * i as u32) as i32;
        let y = (LEGEND_H / 2) as i32;
        legend_area
            .draw(&Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill_style(&style)))
            .map_err(backend_err)?;
        let label = truncate_to_width(key, FONT_PX, slot.saturating_sub(20));
        if !label.is_empty() {
            legend_area
                .draw(&Text::new(label, (x + 14, y - (FONT_PX as i32) / 2), (FontFamily::SansSerif, FONT_PX)))
                .map_err(backend_err)?;
        }
    }

    let left_label_px = state
        .y
        .ticks(cfg.y_ticks)
        .iter()
        .map(|v| estimate_text_width_px(&y_fmt(*v), FONT_PX))
        .max()
        .unwrap_or(0)
        .saturating_add(18)
        .clamp(48, 140);

    let mut ctx = ChartBuilder::on(&plot_area)
        .margin(MARGIN)
        .set_label_area_size(LabelAreaPosition::Left, left_label_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)
        .map_err(backend_err)?;

    let x_fmt = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => codes.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let y_label_fmt = |v: &f64| y_fmt(*v);

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(codes.len())
        .y_labels(cfg.y_ticks)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_label_fmt)
        .y_desc(state.y_label.as_str())
        .label_style((FontFamily::SansSerif, FONT_PX))
        .axis_desc_style((FontFamily::SansSerif, FONT_PX + 2))
        .draw()
        .map_err(backend_err)?;

    // Side gap per bar, approximating the band scale's inner padding.
    let (plot_w, _) = plot_area.dim_in_pixel();
    let seg_px = plot_w.saturating_sub(left_label_px + 2 * MARGIN) / codes.len().max(1) as u32;
    let gap = ((seg_px as f64 * cfg.padding_inner) / 2.0).round() as u32;

    for s in &state.series {
        let style = SeriesStyle::for_subject(&s.key, s.index);
        ctx.draw_series(s.points.iter().enumerate().map(|(i, p)| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), p.upper),
                    (SegmentValue::Exact(i + 1), p.lower),
                ],
                fill_style(&style),
            );
            bar.set_margin(0, 0, gap, gap);
            bar
        }))
        .map_err(backend_err)?;
    }

    root.present().map_err(backend_err)?;
    Ok(())
}
