//! Subject series styling shared by the SVG writer and the plotters export.
//!
//! The first ten subjects take the Office palette; later ones reuse its hues
//! with the lightness shifted per palette cycle so they stay distinguishable.

use plotters::prelude::*;

use super::util::OFFICE10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Clone, Copy, Debug)]
pub struct Hsl {
    pub h_deg: f64, // 0..360
    pub s: f64,     // 0..1
    pub l: f64,     // 0..1
}

#[derive(Clone, Debug)]
pub struct SeriesStyle {
    pub subject: String,
    pub rgb: Rgb8,
    pub hex: String,
}

impl SeriesStyle {
    /// Style for the subject at stacking position `index`.
    pub fn for_subject(subject: &str, index: usize) -> Self {
        let base = OFFICE10[index % OFFICE10.len()];
        let base = Rgb8 {
            r: base.0,
            g: base.1,
            b: base.2,
        };
        let cycle = index / OFFICE10.len();
        let rgb = if cycle == 0 {
            base
        } else {
            let mut hsl = rgb8_to_hsl(base);
            // alternate lighter/darker, growing with each cycle
            let step = 0.12 * cycle.div_ceil(2) as f64;
            hsl.l = clamp01(if cycle % 2 == 1 { hsl.l + step } else { hsl.l - step });
            hsl_to_rgb8(hsl)
        };
        Self {
            subject: subject.to_string(),
            rgb,
            hex: rgb_to_hex(rgb),
        }
    }
}

pub fn rgb_color(style: &SeriesStyle) -> RGBColor {
    RGBColor(style.rgb.r, style.rgb.g, style.rgb.b)
}

/// Build a filled style for bars.
pub fn fill_style(style: &SeriesStyle) -> ShapeStyle {
    rgb_color(style).filled()
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn rgb8_to_hsl(c: Rgb8) -> Hsl {
    let r = c.r as f64 / 255.0;
    let g = c.g as f64 / 255.0;
    let b = c.b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hsl { h_deg: 0.0, s: 0.0, l };
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Hsl { h_deg: h * 60.0, s, l }
}

// HSL -> RGB conversion (linear; sufficient for chart colors)
fn hsl_to_rgb8(hsl: Hsl) -> Rgb8 {
    let h = (hsl.h_deg % 360.0) / 360.0;
    let s = clamp01(hsl.s);
    let l = clamp01(hsl.l);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb8 { r: v, g: v, b: v };
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb8 {
        r: (r * 255.0).round() as u8,
        g: (g * 255.0).round() as u8,
        b: (b * 255.0).round() as u8,
    }
}

fn rgb_to_hex(rgb: Rgb8) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
}
