use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tmy_calculator::NormalizedRecord;

// Column names written by the normalized and TMY tables
#[derive(Debug, Deserialize)]
struct RecordRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Day")]
    day: u32,
    #[serde(rename = "Hour")]
    hour: u32,
    #[serde(rename = "Solar Radiation")]
    value: f64,
}

impl From<RecordRow> for NormalizedRecord {
    fn from(row: RecordRow) -> Self {
        NormalizedRecord {
            year: row.year,
            month: row.month,
            day: row.day,
            hour: row.hour,
            value: row.value,
        }
    }
}

/// Read a previously written normalized or TMY table
pub fn read_records(path: &Path) -> Result<Vec<NormalizedRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<RecordRow>() {
        let row = row.with_context(|| format!("Malformed record in {}", path.display()))?;
        records.push(row.into());
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmy_calculator::export::write_normalized_csv;

    #[test]
    fn test_reads_written_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_Test_solar_data.csv");
        let records = vec![
            NormalizedRecord { year: 2019, month: 2, day: 29, hour: 0, value: 0.0 },
            NormalizedRecord { year: 2020, month: 2, day: 29, hour: 0, value: 3.5 },
        ];

        write_normalized_csv(&path, &records).unwrap();
        assert_eq!(read_records(&path).unwrap(), records);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_records(&dir.path().join("absent.csv")).is_err());
    }
}
