use indexmap::IndexMap;
use meatstack_rs::chart::StackedBarChart;
use meatstack_rs::config::ChartConfig;
use meatstack_rs::models::{CountryRecord, StackMode, StackSeries};
use meatstack_rs::stack::stack_layout;

const EPS: f64 = 1e-9;

fn rec(code: &str, vals: &[(&str, f64)]) -> CountryRecord {
    let mut value = IndexMap::new();
    for (k, v) in vals {
        value.insert(k.to_string(), *v);
    }
    CountryRecord { code: code.into(), name: code.into(), icon: String::new(), value }
}

fn sample() -> (Vec<CountryRecord>, Vec<String>) {
    let recs = vec![
        rec("AAA", &[("beef", 26.0), ("pig", 20.1), ("poultry", 45.0), ("sheep", 7.2)]),
        rec("BBB", &[("beef", 3.5), ("pig", 30.0), ("poultry", 12.0), ("sheep", 0.4)]),
        rec("CCC", &[("beef", 0.0), ("pig", 0.0), ("poultry", 0.0), ("sheep", 0.0)]),
        rec("DDD", &[("beef", 14.0), ("pig", 1.0), ("poultry", 22.5), ("sheep", 11.0)]),
    ];
    let keys = recs[0].value.keys().cloned().collect();
    (recs, keys)
}

fn point(series: &[StackSeries], key: &str, country: usize) -> (f64, f64) {
    let s = series.iter().find(|s| s.key == key).unwrap();
    (s.points[country].lower, s.points[country].upper)
}

#[test]
fn stacked_series_touch() {
    let (recs, keys) = sample();
    let series = stack_layout(&recs, &keys, StackMode::Stacked);
    assert_eq!(series.len(), keys.len());
    for j in 0..recs.len() {
        assert_eq!(series[0].points[j].lower, 0.0);
        for k in 1..series.len() {
            assert!((series[k - 1].points[j].upper - series[k].points[j].lower).abs() < EPS);
        }
        let top = series.last().unwrap().points[j].upper;
        assert!((top - recs[j].total()).abs() < EPS);
    }
}

#[test]
fn percentage_series_end_at_one() {
    let (recs, keys) = sample();
    let series = stack_layout(&recs, &keys, StackMode::Percentage);
    for (j, r) in recs.iter().enumerate() {
        let last = series.last().unwrap().points[j];
        if r.total() == 0.0 {
            assert!(series.iter().all(|s| s.points[j].lower == 0.0 && s.points[j].upper == 0.0));
            continue;
        }
        assert!((last.upper - 1.0).abs() < EPS);
        for k in 0..series.len() {
            let p = series[k].points[j];
            assert!(p.lower <= p.upper);
            if k > 0 {
                assert!(series[k - 1].points[j].upper <= p.lower + EPS);
            }
        }
    }
}

#[test]
fn separated_floors_clear_previous_series() {
    let (recs, keys) = sample();
    let series = stack_layout(&recs, &keys, StackMode::Separated);
    for (j, r) in recs.iter().enumerate() {
        assert_eq!(series[0].points[j].lower, 0.0);
        assert_eq!(series[0].points[j].upper, r.value[&keys[0]]);
    }
    for k in 1..series.len() {
        let floor = series[k - 1]
            .points
            .iter()
            .map(|p| p.upper)
            .fold(f64::NEG_INFINITY, f64::max);
        for (j, r) in recs.iter().enumerate() {
            let p = series[k].points[j];
            assert!(p.lower >= floor - EPS);
            assert!((p.height() - r.value[&keys[k]]).abs() < EPS);
        }
    }
}

#[test]
fn two_country_example() {
    let recs = vec![
        rec("B", &[("beef", 4.0), ("pork", 4.0)]),
        rec("A", &[("beef", 10.0), ("pork", 5.0)]),
    ];
    let mut chart = StackedBarChart::new(recs, "kg", "share", ChartConfig::default()).unwrap();
    let codes: Vec<&str> = chart.records().iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, ["A", "B"]);

    let stacked = chart.on_stack_change(StackMode::Stacked).clone();
    assert_eq!(point(&stacked.series, "beef", 0), (0.0, 10.0));
    assert_eq!(point(&stacked.series, "pork", 0), (10.0, 15.0));
    assert_eq!(point(&stacked.series, "beef", 1), (0.0, 4.0));
    assert_eq!(point(&stacked.series, "pork", 1), (4.0, 8.0));
    assert_eq!(stacked.y.domain, (0.0, 15.0));
    assert_eq!(stacked.y_label, "kg");

    let pct = chart.on_stack_change(StackMode::Percentage).clone();
    let (lo, hi) = point(&pct.series, "beef", 0);
    assert_eq!(lo, 0.0);
    assert!((hi - 0.667).abs() < 1e-3);
    let (lo, hi) = point(&pct.series, "pork", 0);
    assert!((lo - 0.667).abs() < 1e-3);
    assert!((hi - 1.0).abs() < EPS);
    assert_eq!(point(&pct.series, "beef", 1), (0.0, 0.5));
    assert_eq!(point(&pct.series, "pork", 1), (0.5, 1.0));
    assert_eq!(pct.y_label, "share");

    let sep = chart.on_stack_change(StackMode::Separated).clone();
    assert_eq!(point(&sep.series, "pork", 0), (10.0, 15.0));
    assert_eq!(point(&sep.series, "pork", 1), (10.0, 14.0));
}

#[test]
fn country_order_is_fixed_across_modes() {
    let (recs, _) = sample();
    let mut chart = StackedBarChart::new(recs, "kg", "share", ChartConfig::default()).unwrap();
    let before: Vec<String> = chart.x_scale().domain().to_vec();
    assert_eq!(before, ["AAA", "DDD", "BBB", "CCC"]);
    for mode in [StackMode::Percentage, StackMode::Separated, StackMode::Stacked] {
        chart.on_stack_change(mode);
        let codes: Vec<String> = chart.records().iter().map(|r| r.code.clone()).collect();
        assert_eq!(codes, before);
        assert_eq!(chart.x_scale().domain(), before.as_slice());
    }
}

#[test]
fn missing_subject_counts_as_zero() {
    let recs = vec![rec("A", &[("beef", 2.0), ("pig", 3.0)]), rec("B", &[("beef", 1.0)])];
    let keys = vec!["beef".to_string(), "pig".to_string()];
    let series = stack_layout(&recs, &keys, StackMode::Stacked);
    assert_eq!(point(&series, "pig", 1), (1.0, 1.0));
}

#[test]
fn nan_totals_sort_without_panicking() {
    let recs: Vec<CountryRecord> = (0..40)
        .map(|i| {
            let beef = if i % 3 == 0 { f64::NAN } else { i as f64 };
            rec(&format!("C{i:02}"), &[("beef", beef), ("pig", 1.0)])
        })
        .collect();
    let chart = StackedBarChart::new(recs, "kg", "share", ChartConfig::default()).unwrap();
    assert_eq!(chart.records().len(), 40);
    let finite: Vec<f64> = chart
        .records()
        .iter()
        .map(CountryRecord::total)
        .filter(|t| t.is_finite())
        .collect();
    assert!(finite.windows(2).all(|w| w[0] >= w[1]));
}
