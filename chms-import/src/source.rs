//! CSV source reading
//!
//! The only place where untyped spreadsheet cells exist. Every cell is
//! trimmed here and empty cells become `None`, so the rest of the pipeline
//! works on a fully typed [`RawRow`].

use crate::error::{ImportError, ImportResult};
use csv::{ByteRecord, StringRecord};
use serde::Deserialize;
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Header names expected in the source file, in spreadsheet order
pub const COLUMNS: &[&str] = &[
    "Name",
    "Gender",
    "DOB",
    "Memorial",
    "Phone",
    "Email",
    "Occupation",
    "Pref. Home Visit",
    "Address",
    "Baptism Date",
    "Baptism Place",
    "Marital Status",
    "Wedding Date",
    "Dietary Pref.",
    "Dates to Remember",
    "Family",
    "Relation",
];

/// Line number of the first data record (the header is line 1)
pub const FIRST_DATA_LINE: usize = 2;

/// One data record of the membership spreadsheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(rename = "Name", deserialize_with = "cell")]
    pub name: Option<String>,
    #[serde(rename = "Gender", deserialize_with = "cell")]
    pub gender: Option<String>,
    #[serde(rename = "DOB", deserialize_with = "cell")]
    pub dob: Option<String>,
    #[serde(rename = "Memorial", deserialize_with = "cell")]
    pub memorial: Option<String>,
    #[serde(rename = "Phone", deserialize_with = "cell")]
    pub phone: Option<String>,
    #[serde(rename = "Email", deserialize_with = "cell")]
    pub email: Option<String>,
    #[serde(rename = "Occupation", deserialize_with = "cell")]
    pub occupation: Option<String>,
    #[serde(rename = "Pref. Home Visit", deserialize_with = "cell")]
    pub pref_home_visit: Option<String>,
    #[serde(rename = "Address", deserialize_with = "cell")]
    pub address: Option<String>,
    #[serde(rename = "Baptism Date", deserialize_with = "cell")]
    pub baptism_date: Option<String>,
    #[serde(rename = "Baptism Place", deserialize_with = "cell")]
    pub baptism_place: Option<String>,
    #[serde(rename = "Marital Status", deserialize_with = "cell")]
    pub marital_status: Option<String>,
    #[serde(rename = "Wedding Date", deserialize_with = "cell")]
    pub wedding_date: Option<String>,
    #[serde(rename = "Dietary Pref.", deserialize_with = "cell")]
    pub dietary_pref: Option<String>,
    #[serde(rename = "Dates to Remember", deserialize_with = "cell")]
    pub dates_to_remember: Option<String>,
    #[serde(rename = "Family", deserialize_with = "cell")]
    pub family: Option<String>,
    #[serde(rename = "Relation", deserialize_with = "cell")]
    pub relation: Option<String>,
}

impl RawRow {
    /// Trimmed name, empty when the cell was blank
    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Coerce a raw cell: trim, blank → `None`
fn cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// Read every data record from a CSV file
pub fn read_rows(path: &Path) -> ImportResult<Vec<RawRow>> {
    let file = std::fs::File::open(path).map_err(|source| ImportError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows_from(file)?;
    info!("Read {} CSV rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read every data record from any CSV stream
///
/// The header must contain every name in [`COLUMNS`] (exact spelling and
/// case); extra columns are ignored. Cells may span several physical lines
/// when quoted. Bytes that are not valid UTF-8 are replaced, never fatal.
pub fn read_rows_from<R: Read>(reader: R) -> ImportResult<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // Header cells padded with spaces still address the right field
    let headers = decode_record(csv_reader.byte_headers()?, 1);
    let headers: StringRecord = headers.iter().map(str::trim).collect();
    let missing: Vec<String> = COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for record in csv_reader.byte_records() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(FIRST_DATA_LINE + rows.len());
        let row: RawRow = decode_record(&record, line).deserialize(Some(&headers))?;
        rows.push(row);
    }
    debug!("Parsed {} data records", rows.len());
    Ok(rows)
}

/// Decode every cell as UTF-8, replacing invalid bytes with U+FFFD
fn decode_record(record: &ByteRecord, line: usize) -> StringRecord {
    record
        .iter()
        .map(|field| {
            let text = String::from_utf8_lossy(field);
            if matches!(text, Cow::Owned(_)) {
                warn!("[Row {}] Cell is not valid UTF-8, invalid bytes replaced", line);
            }
            text
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        COLUMNS
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn cells_are_trimmed_and_blank_cells_are_none() {
        let csv = format!(
            "{}\n  Anil Kumar ,Male,1980,,,,, ,,,,,,,,A,Head\n",
            header()
        );
        let rows = read_rows_from(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name.as_deref(), Some("Anil Kumar"));
        assert_eq!(rows[0].dob.as_deref(), Some("1980"));
        assert_eq!(rows[0].pref_home_visit, None);
        assert_eq!(rows[0].family.as_deref(), Some("A"));
    }

    #[test]
    fn quoted_cell_may_span_lines() {
        let csv = format!(
            "{}\nAsha,Female,,,,,,,,,,,,,\"15/3/2020 - Graduation\n2019 - ?\",A,Spouse\n",
            header()
        );
        let rows = read_rows_from(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].dates_to_remember.as_deref(),
            Some("15/3/2020 - Graduation\n2019 - ?")
        );
    }

    #[test]
    fn latin1_cell_is_decoded_lossily() {
        let mut csv = format!("{}\n", header()).into_bytes();
        csv.extend_from_slice(b"Jos\xE9 Silva,Male,,,,,,,,,,,,,,,\nRaj,,,,,,,,,,,,,,,,\n");
        let rows = read_rows_from(csv.as_slice()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name.as_deref(), Some("Jos\u{FFFD} Silva"));
        assert_eq!(rows[0].gender.as_deref(), Some("Male"));
        assert_eq!(rows[1].name.as_deref(), Some("Raj"));
    }

    #[test]
    fn missing_header_columns_are_reported() {
        let csv = "Name,Gender\nAnil,Male\n";
        let err = read_rows_from(csv.as_bytes()).unwrap_err();

        match err {
            ImportError::MissingColumns(missing) => {
                assert!(missing.contains(&"Family".to_string()));
                assert!(!missing.contains(&"Name".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
