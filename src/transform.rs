//! Reshape raw consumption rows into one [`CountryRecord`] per country.
//!
//! Typical usage:
//! ```
//! use meatstack_rs::models::{ConsumptionRow, CountryCodeRow};
//! use meatstack_rs::transform::{process_data, CountryNames, RowFilter};
//!
//! let rows = vec![
//!     ConsumptionRow::new("DEU", "BEEF", "9.5"),
//!     ConsumptionRow::new("WLD", "BEEF", "6.4"),
//! ];
//! let names = CountryNames::from_rows(&[CountryCodeRow {
//!     country: "Germany".into(),
//!     alpha3: "DEU".into(),
//! }]);
//! let recs = process_data(&rows, &names, &["WLD".to_string()], &RowFilter::default(), "assets/icons")?;
//! assert_eq!(recs[0].icon, "assets/icons/germany.svg");
//! # Ok::<(), meatstack_rs::error::ChartError>(())
//! ```

use crate::error::ChartError;
use crate::models::{ConsumptionRow, CountryCodeRow, CountryRecord};
use ahash::AHashMap;
use indexmap::IndexMap;

/// Precomputed `Alpha-3 code -> display name` lookup.
#[derive(Debug, Clone, Default)]
pub struct CountryNames {
    by_code: AHashMap<String, String>,
}

impl CountryNames {
    /// First occurrence of a code wins.
    pub fn from_rows(rows: &[CountryCodeRow]) -> Self {
        let mut by_code = AHashMap::with_capacity(rows.len());
        for r in rows {
            by_code
                .entry(r.alpha3.clone())
                .or_insert_with(|| r.country.clone());
        }
        Self { by_code }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Optional row selection on the `TIME` and `MEASURE` columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub time: Option<String>,
    pub measure: Option<String>,
}

impl RowFilter {
    /// Filter from free-text inputs; blank fields match every row.
    pub fn from_text(time: &str, measure: &str) -> Self {
        let field = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        RowFilter {
            time: field(time),
            measure: field(measure),
        }
    }

    pub fn keeps(&self, row: &ConsumptionRow) -> bool {
        let matches = |want: &Option<String>, have: &Option<String>| match want {
            Some(w) => have.as_deref() == Some(w.as_str()),
            None => true,
        };
        matches(&self.time, &row.time) && matches(&self.measure, &row.measure)
    }
}

/// Icon path for a country name: lowercase, spaces replaced by hyphens.
pub fn icon_path(icon_dir: &str, name: &str) -> String {
    let slug = name.to_lowercase().replace(' ', "-");
    let dir = icon_dir.trim_end_matches('/');
    if dir.is_empty() {
        format!("{slug}.svg")
    } else {
        format!("{dir}/{slug}.svg")
    }
}

/// Build per-country records from consumption rows.
///
/// Rows for excluded codes or rejected by `filter` are dropped. Subjects are
/// lowercased; a repeated (country, subject) pair keeps the last value.
/// Values must be finite numbers (`NaN` and `inf` are rejected).
/// Records come back in first-appearance order.
pub fn process_data(
    rows: &[ConsumptionRow],
    names: &CountryNames,
    excluded: &[String],
    filter: &RowFilter,
    icon_dir: &str,
) -> Result<Vec<CountryRecord>, ChartError> {
    let mut groups: IndexMap<&str, IndexMap<String, f64>> = IndexMap::new();
    for row in rows {
        let code = row.location.as_str();
        if excluded.iter().any(|e| e == code) || !filter.keeps(row) {
            continue;
        }
        let subject = row.subject.to_lowercase();
        let value = row
            .value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ChartError::InvalidValue {
                code: code.to_string(),
                subject: subject.clone(),
                text: row.value.clone(),
            })?;
        groups.entry(code).or_default().insert(subject, value);
    }

    let mut out = Vec::with_capacity(groups.len());
    for (code, value) in groups {
        let name = names
            .get(code)
            .ok_or_else(|| ChartError::MissingCountryName {
                code: code.to_string(),
            })?
            .to_string();
        let icon = icon_path(icon_dir, &name);
        out.push(CountryRecord {
            code: code.to_string(),
            name,
            icon,
            value,
        });
    }
    log::debug!("transformed {} rows into {} country records", rows.len(), out.len());
    Ok(out)
}

/// True when every record carries the first record's subject keys in the
/// same order. Stacking assumes this.
pub fn subject_keys_consistent(records: &[CountryRecord]) -> bool {
    let Some(first) = records.first() else {
        return true;
    };
    records
        .iter()
        .all(|r| r.value.keys().eq(first.value.keys()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> CountryNames {
        CountryNames::from_rows(&[
            CountryCodeRow {
                country: "New Zealand".into(),
                alpha3: "NZL".into(),
            },
            CountryCodeRow {
                country: "Japan".into(),
                alpha3: "JPN".into(),
            },
        ])
    }

    #[test]
    fn icon_slug_replaces_every_space() {
        assert_eq!(
            icon_path("assets/icons/", "United States of America"),
            "assets/icons/united-states-of-america.svg"
        );
        assert_eq!(icon_path("", "Japan"), "japan.svg");
    }

    #[test]
    fn text_filter_ignores_blank_fields() {
        let any = RowFilter::from_text("  ", "");
        assert!(any.time.is_none() && any.measure.is_none());

        let f = RowFilter::from_text(" 2017 ", "KG_CAP");
        assert_eq!(f.time.as_deref(), Some("2017"));
        assert_eq!(f.measure.as_deref(), Some("KG_CAP"));
        let mut row = ConsumptionRow::new("NZL", "BEEF", "1");
        assert!(!f.keeps(&row));
        row.time = Some("2017".into());
        row.measure = Some("KG_CAP".into());
        assert!(f.keeps(&row));
    }

    #[test]
    fn later_duplicate_overwrites_earlier_value() {
        let rows = vec![
            ConsumptionRow::new("JPN", "BEEF", "1"),
            ConsumptionRow::new("JPN", "beef", "2"),
        ];
        let recs = process_data(&rows, &names(), &[], &RowFilter::default(), "i").unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].value.len(), 1);
        assert_eq!(recs[0].value["beef"], 2.0);
    }

    #[test]
    fn unparseable_value_names_the_row() {
        let rows = vec![ConsumptionRow::new("JPN", "PIG", "n/a")];
        let err = process_data(&rows, &names(), &[], &RowFilter::default(), "i").unwrap_err();
        match err {
            ChartError::InvalidValue { code, subject, text } => {
                assert_eq!((code.as_str(), subject.as_str(), text.as_str()), ("JPN", "pig", "n/a"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn row_filter_matches_time_and_measure() {
        let mut row = ConsumptionRow::new("JPN", "PIG", "3");
        row.time = Some("2020".into());
        row.measure = Some("KG_CAP".into());
        let f = RowFilter {
            time: Some("2020".into()),
            measure: None,
        };
        assert!(f.keeps(&row));
        let f = RowFilter {
            time: Some("2019".into()),
            measure: None,
        };
        assert!(!f.keeps(&row));
        let f = RowFilter {
            time: None,
            measure: Some("THND_TONNE".into()),
        };
        assert!(!f.keeps(&row));
    }

    #[test]
    fn key_consistency_checks_order_too() {
        let rows = vec![
            ConsumptionRow::new("JPN", "BEEF", "1"),
            ConsumptionRow::new("JPN", "PIG", "1"),
            ConsumptionRow::new("NZL", "PIG", "1"),
            ConsumptionRow::new("NZL", "BEEF", "1"),
        ];
        let recs = process_data(&rows, &names(), &[], &RowFilter::default(), "i").unwrap();
        assert!(!subject_keys_consistent(&recs));
        assert!(subject_keys_consistent(&recs[..1]));
        assert!(subject_keys_consistent(&[]));
    }
}
