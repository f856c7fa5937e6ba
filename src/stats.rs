use crate::models::CountryRecord;
use serde::{Deserialize, Serialize};

/// Summary statistics for one subject across countries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub subject: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Country and its summed consumption.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryTotal {
    pub code: String,
    pub name: String,
    pub total: f64,
}

/// Compute per-subject statistics, subjects in first-seen order.
pub fn subject_summary(records: &[CountryRecord]) -> Vec<Summary> {
    let mut groups: indexmap::IndexMap<&str, Vec<f64>> = indexmap::IndexMap::new();
    for r in records {
        for (subject, v) in &r.value {
            groups.entry(subject.as_str()).or_default().push(*v);
        }
    }

    let mut out = Vec::new();
    for (subject, mut vals) in groups {
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else { None };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary { subject: subject.to_string(), count, min, max, mean, median });
    }
    out
}

/// Totals per country, largest first (ties keep input order).
pub fn country_totals(records: &[CountryRecord]) -> Vec<CountryTotal> {
    let mut out: Vec<CountryTotal> = records
        .iter()
        .map(|r| CountryTotal { code: r.code.clone(), name: r.name.clone(), total: r.total() })
        .collect();
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    out
}
