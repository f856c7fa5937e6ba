//! Scene → SVG document, with SMIL transitions for bars.
//!
//! Layout of the output mirrors a typical D3 bar chart: one `g.axis` per
//! axis, one `g.series` per subject holding a `rect` per country, and an
//! `image` icon under each category tick.

use std::fmt::Write;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::style::SeriesStyle;
use super::util::{fmt_num, xml_escape};
use crate::chart::{BarGeom, Scene, SceneBar, XTick, YTick};
use crate::models::StackMode;
use crate::transition::CUBIC_IN_OUT_SPLINE;

/// Characters escaped in icon hrefs.
const HREF_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}');

/// Where bars start before animating to the scene's geometry.
#[derive(Debug, Clone, Copy)]
pub enum Start<'a> {
    /// No animation; bars are drawn at their final geometry.
    Final,
    /// Bars grow out of the X axis.
    Baseline,
    /// Bars move from another scene's geometry (e.g. the previous mode).
    Previous(&'a Scene),
}

trait SvgElement {
    fn render(&self, out: &mut String);
}

struct XAxis<'a> {
    baseline_y: f64,
    ticks: &'a [XTick],
}

impl SvgElement for XAxis<'_> {
    fn render(&self, out: &mut String) {
        let _ = writeln!(
            out,
            r#"<g class="axis x-axis" transform="translate(0,{})" text-anchor="middle">"#,
            fmt_num(self.baseline_y)
        );
        for t in self.ticks {
            let (ix, iy, size) = t.icon_box;
            let href = utf8_percent_encode(&t.icon, HREF_SET).to_string();
            let _ = writeln!(
                out,
                r#"  <g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="6"/><text fill="currentColor" y="9" dy="0.71em">{}</text><image x="{}" y="{}" width="{}" height="{}" href="{}"><title>{}</title></image></g>"#,
                fmt_num(t.x),
                xml_escape(&t.code),
                fmt_num(ix),
                fmt_num(iy),
                fmt_num(size),
                fmt_num(size),
                xml_escape(&href),
                xml_escape(&t.name),
            );
        }
        out.push_str("</g>\n");
    }
}

struct YAxis<'a> {
    axis_x: f64,
    ticks: &'a [YTick],
    title: &'a str,
    title_pos: (f64, f64),
}

impl SvgElement for YAxis<'_> {
    fn render(&self, out: &mut String) {
        let _ = writeln!(
            out,
            r#"<g class="axis y-axis" transform="translate({},0)" text-anchor="end">"#,
            fmt_num(self.axis_x)
        );
        for t in self.ticks {
            let _ = writeln!(
                out,
                r#"  <g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="-6"/><text fill="currentColor" x="-9" dy="0.32em">{}</text></g>"#,
                fmt_num(t.y),
                xml_escape(&t.label)
            );
        }
        let _ = writeln!(
            out,
            r#"  <text class="title" fill="currentColor" x="{}" y="{}" text-anchor="start">{}</text>"#,
            fmt_num(self.title_pos.0 - self.axis_x),
            fmt_num(self.title_pos.1),
            xml_escape(self.title)
        );
        out.push_str("</g>\n");
    }
}

struct BarRect<'a> {
    bar: &'a SceneBar,
    /// Geometry animated from on load, if any.
    from: Option<BarGeom>,
    /// Geometry of the same bar in other modes, animated from on demand.
    on_demand: Vec<(StackMode, BarGeom)>,
    duration_ms: u128,
}

/// Attributes whose value differs between `from` and `to`.
fn changed(from: BarGeom, to: BarGeom) -> impl Iterator<Item = (&'static str, String, String)> {
    [
        ("x", from.x, to.x),
        ("y", from.y, to.y),
        ("width", from.width, to.width),
        ("height", from.height, to.height),
    ]
    .into_iter()
    .map(|(attr, a, b)| (attr, fmt_num(a), fmt_num(b)))
    .filter(|(_, a, b)| a != b)
}

impl SvgElement for BarRect<'_> {
    fn render(&self, out: &mut String) {
        let to = self.bar.geom;
        let start = self.from.unwrap_or(to);
        let _ = write!(
            out,
            r#"  <rect x="{}" y="{}" width="{}" height="{}">"#,
            fmt_num(start.x),
            fmt_num(start.y),
            fmt_num(start.width),
            fmt_num(start.height)
        );
        let _ = write!(
            out,
            "<title>{} {}: {}</title>",
            xml_escape(&self.bar.code),
            xml_escape(&self.bar.key),
            fmt_num(self.bar.value)
        );
        let delay = self.bar.delay;
        if let Some(from) = self.from {
            for (attr, a, b) in changed(from, to) {
                let _ = write!(
                    out,
                    r#"<animate attributeName="{attr}" from="{a}" to="{b}" begin="{}ms" dur="{}ms" fill="freeze" calcMode="spline" keyTimes="0;1" keySplines="{CUBIC_IN_OUT_SPLINE}"/>"#,
                    delay.as_millis(),
                    self.duration_ms
                );
            }
        }
        // Started by the page script when the toggle switches away from `mode`.
        for (mode, from) in &self.on_demand {
            for (attr, a, b) in changed(*from, to) {
                if !delay.is_zero() {
                    let _ = write!(
                        out,
                        r#"<set class="from-{mode}" attributeName="{attr}" to="{a}" begin="indefinite" dur="{}ms"/>"#,
                        delay.as_millis()
                    );
                }
                let _ = write!(
                    out,
                    r#"<animate class="from-{mode}" data-delay="{}" attributeName="{attr}" from="{a}" to="{b}" begin="indefinite" dur="{}ms" fill="freeze" calcMode="spline" keyTimes="0;1" keySplines="{CUBIC_IN_OUT_SPLINE}"/>"#,
                    fmt_num(delay.as_secs_f64()),
                    self.duration_ms
                );
            }
        }
        out.push_str("</rect>\n");
    }
}

/// Render `scene` as a standalone SVG document.
pub fn render_scene(scene: &Scene, start: Start<'_>) -> String {
    render_switchable(scene, start, &[])
}

/// Like [`render_scene`], plus transitions from each of `sources` that stay
/// idle (`begin="indefinite"`) until started from script. Each group carries
/// the class `from-{mode}` of its source scene.
///
/// Sources whose bar count differs from `scene` are skipped.
pub fn render_switchable(scene: &Scene, start: Start<'_>, sources: &[&Scene]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg" role="img" class="stacked-bar-chart mode-{}" font-family="sans-serif" font-size="10">"#,
        fmt_num(scene.width),
        fmt_num(scene.height),
        scene.mode
    );
    let _ = writeln!(out, "<title>{}</title>", xml_escape(&scene.y_title));

    XAxis {
        baseline_y: scene.baseline_y,
        ticks: &scene.x_ticks,
    }
    .render(&mut out);
    YAxis {
        axis_x: scene.axis_x,
        ticks: &scene.y_ticks,
        title: &scene.y_title,
        title_pos: scene.y_title_pos,
    }
    .render(&mut out);

    let previous = match start {
        Start::Previous(prev) if prev.bars.len() == scene.bars.len() => Some(prev),
        _ => None,
    };
    let sources: Vec<&Scene> = sources
        .iter()
        .copied()
        .filter(|s| s.mode != scene.mode && s.bars.len() == scene.bars.len())
        .collect();
    let duration_ms = scene.duration.as_millis();
    for (si, key) in scene.keys.iter().enumerate() {
        let style = SeriesStyle::for_subject(key, si);
        let _ = writeln!(
            out,
            r#"<g class="series {}" fill="{}">"#,
            xml_escape(key),
            style.hex
        );
        for (bi, bar) in scene.bars.iter().enumerate().filter(|(_, b)| b.series_index == si) {
            let from = match start {
                Start::Final => None,
                Start::Previous(_) if previous.is_some() => previous.map(|p| p.bars[bi].geom),
                _ => Some(BarGeom::collapsed(bar.geom.x, bar.geom.width, scene.baseline_y)),
            };
            BarRect {
                bar,
                from,
                on_demand: sources.iter().map(|s| (s.mode, s.bars[bi].geom)).collect(),
                duration_ms,
            }
            .render(&mut out);
        }
        out.push_str("</g>\n");
    }
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_escapes_spaces_and_hashes() {
        let s = utf8_percent_encode("icons/a b#c.svg", HREF_SET).to_string();
        assert_eq!(s, "icons/a%20b%23c.svg");
    }
}
