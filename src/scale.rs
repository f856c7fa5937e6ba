//! Band and linear scales with "nice" tick generation.

use num_format::{Locale, ToFormattedString};

/// Categorical scale placing equal-width bands across a pixel range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    step: f64,
    start: f64,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f64, f64), padding_inner: f64, padding_outer: f64) -> Self {
        let mut scale = Self {
            domain,
            range,
            padding_inner: padding_inner.clamp(0.0, 1.0),
            padding_outer: padding_outer.max(0.0),
            align: 0.5,
            step: 0.0,
            start: range.0,
        };
        scale.rescale();
        scale
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        self.step = span / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.start = r0 + (span - self.step * (n - self.padding_inner)) * self.align;
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bandwidth(&self) -> f64 {
        self.step * (1.0 - self.padding_inner)
    }

    /// Left edge of the band for `key`.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.domain.iter().position(|d| d == key).map(|i| self.at(i))
    }

    /// Left edge of the band at domain index `i`.
    pub fn at(&self, i: usize) -> f64 {
        self.start + self.step * i as f64
    }

    pub fn center_at(&self, i: usize) -> f64 {
        self.at(i) + self.bandwidth() / 2.0
    }
}

/// Continuous scale mapping `[d0, d1]` onto `[r0, r1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Roughly `count` evenly spaced round values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Formatter matching the precision of `ticks(count)`.
    pub fn tick_format(&self, count: usize, locale: &'static Locale) -> impl Fn(f64) -> String {
        let step = tick_step(self.domain.0, self.domain.1, count).abs();
        let decimals = if step > 0.0 && step < 1.0 {
            (-step.log10().floor()) as usize
        } else {
            0
        };
        move |v: f64| format_tick(v, decimals, locale)
    }
}

/// Format with `decimals` places and locale thousands separators.
pub fn format_tick(v: f64, decimals: usize, locale: &'static Locale) -> String {
    let rounded = format!("{:.*}", decimals, v.abs());
    let (int_part, frac) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut out = String::new();
    let negative = v < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        out.push('-');
    }
    out.push_str(&int_val.to_formatted_string(locale));
    if let Some(f) = frac {
        out.push_str(locale.decimal());
        out.push_str(f);
    }
    out
}

/// Signed tick increment: positive means a multiple of a power of ten,
/// negative means `1 / -inc` (keeps fractional steps exact).
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if !(stop > start) || count == 0 {
        return 0.0;
    }
    let inc = tick_increment(start, stop, count);
    if inc < 0.0 { -1.0 / inc } else { inc }
}

/// Nice ticks in `[start, stop]` using the 1/2/5 × 10^k step rule.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi, reverse) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };
    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }
    let mut out = Vec::new();
    if inc > 0.0 {
        let mut i1 = (lo / inc).round();
        let mut i2 = (hi / inc).round();
        if i1 * inc < lo {
            i1 += 1.0;
        }
        if i2 * inc > hi {
            i2 -= 1.0;
        }
        let mut i = i1;
        while i <= i2 {
            out.push(i * inc);
            i += 1.0;
        }
    } else {
        let inv = -inc;
        let mut i1 = (lo * inv).round();
        let mut i2 = (hi * inv).round();
        if i1 / inv < lo {
            i1 += 1.0;
        }
        if i2 / inv > hi {
            i2 -= 1.0;
        }
        let mut i = i1;
        while i <= i2 {
            out.push(i / inv);
            i += 1.0;
        }
    }
    if reverse {
        out.reverse();
    }
    out
}
