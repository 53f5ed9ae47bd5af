//! CSV ingestion of address records.
//!
//! Expected headers: `Full_Location`, `Type`, `Families`, `Village`, and an
//! optional `Label`. Everything past parsing is the batch coordinator's
//! problem; ingestion only guarantees the fields exist and are typed.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One input row, immutable once read.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "Full_Location")]
    pub full_location: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Families")]
    pub families: f64,
    #[serde(rename = "Village")]
    pub village: String,
    #[serde(rename = "Label", default)]
    pub label: Option<String>,
}

impl AddressRecord {
    /// Whether the row is an origin-type record ("Origin", " origin ", ...).
    pub fn is_origin(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case("origin")
    }

    /// Display label: the `Label` column when present and non-empty,
    /// otherwise the village name.
    pub fn display_label(&self) -> &str {
        match &self.label {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.village,
        }
    }
}

/// Ingestion failures. These stop the run before any geocoding starts;
/// per-record problems during resolution are handled by the batch coordinator
/// instead.
#[derive(Debug)]
pub enum IngestError {
    Io(String),
    Malformed(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot read input: {}", msg),
            Self::Malformed(msg) => write!(f, "malformed input: {}", msg),
        }
    }
}

impl std::error::Error for IngestError {}

/// Read all records from a CSV file.
pub fn read_records(path: &Path) -> Result<Vec<AddressRecord>, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::Io(e.to_string()))?;
    read_records_from_reader(file)
}

/// Read all records from any CSV byte stream (file, upload body, test data).
pub fn read_records_from_reader<R: Read>(reader: R) -> Result<Vec<AddressRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, row) in csv_reader.deserialize().enumerate() {
        let record: AddressRecord =
            row.map_err(|e| IngestError::Malformed(format!("row {}: {}", i + 1, e)))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Full_Location,Type,Families,Village,Label
\"Rampur, Sitapur District, Uttar Pradesh, India\",Origin,42,Rampur,Rampur (origin)
\"Basti, Gonda, Uttar Pradesh\",Destination,17,Basti,
";

    #[test]
    fn test_read_sample_rows() {
        let records = read_records_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].village, "Rampur");
        assert!((records[0].families - 42.0).abs() < 1e-9);
        assert!(records[0].is_origin());
        assert!(!records[1].is_origin());
    }

    #[test]
    fn test_label_defaults_to_village() {
        let records = read_records_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records[0].display_label(), "Rampur (origin)");
        // Empty Label cell falls back to the village name.
        assert_eq!(records[1].display_label(), "Basti");
    }

    #[test]
    fn test_missing_label_column() {
        let csv = "\
Full_Location,Type,Families,Village
\"Rampur, Uttar Pradesh\",origin,3,Rampur
";
        let records = read_records_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records[0].display_label(), "Rampur");
        assert!(records[0].is_origin());
    }

    #[test]
    fn test_origin_detection_trims_and_ignores_case() {
        let csv = "\
Full_Location,Type,Families,Village
\"A, B, C\",  ORIGIN  ,1,A
\"A, B, C\",relief camp,1,A
";
        let records = read_records_from_reader(csv.as_bytes()).unwrap();
        assert!(records[0].is_origin());
        assert!(!records[1].is_origin());
    }

    #[test]
    fn test_malformed_families_is_an_error() {
        let csv = "\
Full_Location,Type,Families,Village
\"A, B, C\",origin,not-a-number,A
";
        let err = read_records_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Malformed(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let records = read_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = read_records(Path::new("/nonexistent/input.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
