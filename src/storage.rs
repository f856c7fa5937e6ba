//! CSV loading of the two input tables and export of transformed records.

use crate::models::{ConsumptionRow, CountryCodeRow, CountryRecord};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

fn read_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (i, row) in rdr.deserialize().enumerate() {
        // +2: header line plus 1-based numbering
        rows.push(row.with_context(|| format!("malformed CSV record on line {}", i + 2))?);
    }
    Ok(rows)
}

/// Parse consumption rows from any reader.
pub fn read_consumption<R: Read>(reader: R) -> Result<Vec<ConsumptionRow>> {
    read_rows(reader)
}

/// Parse country code rows from any reader.
pub fn read_country_codes<R: Read>(reader: R) -> Result<Vec<CountryCodeRow>> {
    read_rows(reader)
}

pub fn load_consumption_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ConsumptionRow>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rows = read_consumption(f).with_context(|| format!("reading {}", path.display()))?;
    log::info!("loaded {} consumption rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn load_country_codes_csv<P: AsRef<Path>>(path: P) -> Result<Vec<CountryCodeRow>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rows = read_country_codes(f).with_context(|| format!("reading {}", path.display()))?;
    log::info!("loaded {} country codes from {}", rows.len(), path.display());
    Ok(rows)
}

/// Save records in long form: one `code,name,subject,value` row per subject.
pub fn save_records_csv<P: AsRef<Path>>(records: &[CountryRecord], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["code", "name", "subject", "value"])?;
    for r in records {
        for (subject, value) in &r.value {
            wtr.serialize((&r.code, &r.name, subject, value))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Save records as a pretty JSON array.
pub fn save_records_json<P: AsRef<Path>>(records: &[CountryRecord], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
