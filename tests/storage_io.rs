use meatstack_rs::storage;
use meatstack_rs::transform::{CountryNames, RowFilter, process_data};
use std::fs;
use tempfile::tempdir;

const CONSUMPTION: &str = "\
LOCATION,INDICATOR,SUBJECT,MEASURE,FREQUENCY,TIME,Value
AUS,MEATCONSUMP,BEEF,KG_CAP,A,2020,20.5
AUS,MEATCONSUMP,PIG,KG_CAP,A,2020,21.0
WLD,MEATCONSUMP,BEEF,KG_CAP,A,2020,6.4
WLD,MEATCONSUMP,PIG,KG_CAP,A,2020,11.0
NZL,MEATCONSUMP,BEEF,KG_CAP,A,2020,11.7
NZL,MEATCONSUMP,PIG,KG_CAP,A,2020,19.0
";

const CODES: &str = "\
Country,Alpha-2 code,Alpha-3 code,Numeric code
Australia,AU,AUS,36
New Zealand,NZ,NZL,554
";

#[test]
fn load_transform_and_save() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("meat.csv");
    let codes = dir.path().join("codes.csv");
    fs::write(&data, CONSUMPTION).unwrap();
    fs::write(&codes, CODES).unwrap();

    let rows = storage::load_consumption_csv(&data).unwrap();
    assert_eq!(rows.len(), 6);
    let code_rows = storage::load_country_codes_csv(&codes).unwrap();
    assert_eq!(code_rows[1].country, "New Zealand");

    let names = CountryNames::from_rows(&code_rows);
    let recs = process_data(&rows, &names, &["WLD".to_string()], &RowFilter::default(), "icons").unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[1].icon, "icons/new-zealand.svg");

    let csv_out = dir.path().join("records.csv");
    storage::save_records_csv(&recs, &csv_out).unwrap();
    let text = fs::read_to_string(&csv_out).unwrap();
    assert!(text.starts_with("code,name,subject,value"));
    assert_eq!(text.lines().count(), 1 + 4);

    let json_out = dir.path().join("records.json");
    storage::save_records_json(&recs, &json_out).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v[0]["value"]["beef"], 20.5);
}

#[test]
fn missing_file_names_the_path() {
    let err = storage::load_consumption_csv("/no/such/meat.csv").unwrap_err();
    assert!(format!("{err:#}").contains("/no/such/meat.csv"));
}

#[test]
fn malformed_row_reports_line() {
    let bad = "LOCATION,SUBJECT,Value\nAUS,BEEF,1\nAUS,PIG\n";
    let err = storage::read_consumption(bad.as_bytes()).unwrap_err();
    assert!(format!("{err:#}").contains("line 3"));
}
