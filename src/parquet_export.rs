use anyhow::Result;
use polars::prelude::*;
use std::path::Path;
use tmy_calculator::NormalizedRecord;

/// Column layout shared with the CSV record tables
pub fn records_to_dataframe(records: &[NormalizedRecord]) -> Result<DataFrame> {
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    let months: Vec<u32> = records.iter().map(|r| r.month).collect();
    let days: Vec<u32> = records.iter().map(|r| r.day).collect();
    let hours: Vec<u32> = records.iter().map(|r| r.hour).collect();
    let values: Vec<f64> = records.iter().map(|r| r.value).collect();

    let df = DataFrame::new(vec![
        Series::new("Year", years),
        Series::new("Month", months),
        Series::new("Day", days),
        Series::new("Hour", hours),
        Series::new("Solar Radiation", values),
    ])?;

    Ok(df)
}

pub fn write_records_parquet(path: &Path, records: &[NormalizedRecord]) -> Result<()> {
    let mut df = records_to_dataframe(records)?;
    ParquetWriter::new(std::fs::File::create(path)?).finish(&mut df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parquet_round_trip_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tmy_Test.parquet");
        let records: Vec<NormalizedRecord> = (0..24)
            .map(|hour| NormalizedRecord {
                year: 2021,
                month: 7,
                day: 1,
                hour,
                value: hour as f64 * 0.5,
            })
            .collect();

        write_records_parquet(&path, &records).unwrap();

        let df = ParquetReader::new(std::fs::File::open(&path).unwrap())
            .finish()
            .unwrap();
        assert_eq!(df.height(), 24);
        assert_eq!(
            df.get_column_names(),
            vec!["Year", "Month", "Day", "Hour", "Solar Radiation"]
        );
        let total: f64 = df.column("Solar Radiation").unwrap().f64().unwrap().sum().unwrap();
        assert_eq!(total, 138.0);
    }
}
