//! Stack layouts: turn per-country subject values into `[lower, upper]`
//! intervals, one series per subject key.
//!
//! All three layouts start from the same unstacked baseline (`[0, v]` per
//! country and series) and differ only in the offset applied afterwards.

use crate::models::{CountryRecord, Interval, StackMode, StackSeries};

/// Compute the series for `mode` over `records` (already in chart order).
///
/// `keys` fixes the series order. A key missing from a record counts as 0.
pub fn stack_layout(records: &[CountryRecord], keys: &[String], mode: StackMode) -> Vec<StackSeries> {
    let mut series: Vec<StackSeries> = keys
        .iter()
        .enumerate()
        .map(|(index, key)| StackSeries {
            key: key.clone(),
            index,
            points: records
                .iter()
                .map(|r| Interval::new(0.0, r.value.get(key).copied().unwrap_or(0.0)))
                .collect(),
        })
        .collect();

    match mode {
        StackMode::Stacked => offset_none(&mut series),
        StackMode::Percentage => offset_expand(&mut series),
        StackMode::Separated => offset_separated(&mut series),
    }
    series
}

/// Cumulative stacking: each series starts where the previous one ended.
pub fn offset_none(series: &mut [StackSeries]) {
    for i in 1..series.len() {
        let (done, rest) = series.split_at_mut(i);
        let prev = &done[i - 1];
        for (cur, below) in rest[0].points.iter_mut().zip(&prev.points) {
            let h = cur.height();
            cur.lower = below.upper;
            cur.upper = below.upper + h;
        }
    }
}

/// Normalize every country's total to 1, then stack cumulatively.
///
/// A country whose total is zero keeps all-zero intervals.
pub fn offset_expand(series: &mut [StackSeries]) {
    let Some(m) = series.first().map(|s| s.points.len()) else {
        return;
    };
    for j in 0..m {
        let total: f64 = series.iter().map(|s| s.points[j].height()).sum();
        if total != 0.0 {
            for s in series.iter_mut() {
                let p = &mut s.points[j];
                p.upper = p.lower + p.height() / total;
            }
        }
    }
    offset_none(series);
}

/// Lift each series onto a floor at the tallest bar top of the previous
/// series (across all countries), keeping per-country heights.
pub fn offset_separated(series: &mut [StackSeries]) {
    for i in 1..series.len() {
        let (done, rest) = series.split_at_mut(i);
        let Some(base) = done[i - 1].max_upper() else {
            return;
        };
        for p in rest[0].points.iter_mut() {
            let h = p.height();
            p.lower = base;
            p.upper = base + h;
        }
    }
}

/// Largest upper bound across all series, used as the Y domain maximum.
pub fn max_upper(series: &[StackSeries]) -> Option<f64> {
    series.iter().filter_map(StackSeries::max_upper).reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn rec(code: &str, vals: &[(&str, f64)]) -> CountryRecord {
        let mut value = IndexMap::new();
        for (k, v) in vals {
            value.insert(k.to_string(), *v);
        }
        CountryRecord {
            code: code.into(),
            name: code.into(),
            icon: String::new(),
            value,
        }
    }

    fn keys() -> Vec<String> {
        vec!["beef".into(), "pork".into()]
    }

    #[test]
    fn stacked_is_cumulative() {
        let recs = [rec("A", &[("beef", 10.0), ("pork", 5.0)]), rec("B", &[("beef", 4.0), ("pork", 4.0)])];
        let s = stack_layout(&recs, &keys(), StackMode::Stacked);
        assert_eq!(s[0].points, vec![Interval::new(0.0, 10.0), Interval::new(0.0, 4.0)]);
        assert_eq!(s[1].points, vec![Interval::new(10.0, 15.0), Interval::new(4.0, 8.0)]);
        assert_eq!(max_upper(&s), Some(15.0));
    }

    #[test]
    fn separated_uses_global_floor() {
        let recs = [rec("A", &[("beef", 10.0), ("pork", 5.0)]), rec("B", &[("beef", 4.0), ("pork", 4.0)])];
        let s = stack_layout(&recs, &keys(), StackMode::Separated);
        assert_eq!(s[0].points, vec![Interval::new(0.0, 10.0), Interval::new(0.0, 4.0)]);
        assert_eq!(s[1].points, vec![Interval::new(10.0, 15.0), Interval::new(10.0, 14.0)]);
    }

    #[test]
    fn percentage_zero_total_is_all_zero() {
        let recs = [rec("Z", &[("beef", 0.0), ("pork", 0.0)])];
        let s = stack_layout(&recs, &keys(), StackMode::Percentage);
        for series in &s {
            assert_eq!(series.points, vec![Interval::new(0.0, 0.0)]);
        }
    }

    #[test]
    fn missing_key_counts_as_zero() {
        let recs = [rec("A", &[("beef", 3.0)])];
        let s = stack_layout(&recs, &keys(), StackMode::Stacked);
        assert_eq!(s[1].points, vec![Interval::new(3.0, 3.0)]);
    }

    #[test]
    fn no_keys_or_countries_is_empty() {
        assert!(stack_layout(&[], &keys(), StackMode::Percentage).iter().all(|s| s.points.is_empty()));
        assert!(stack_layout(&[rec("A", &[])], &[], StackMode::Separated).is_empty());
        assert_eq!(max_upper(&[]), None);
    }
}
