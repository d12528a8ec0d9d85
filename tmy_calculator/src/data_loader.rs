use crate::error::Result;
use crate::models::{RawRow, YearColumns};
use crate::row_classifier::RowClassifier;
use csv::ReaderBuilder;
use log::info;
use std::io::Read;
use std::path::Path;

/// The wide input table after classification
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub header: Vec<String>,
    pub columns: YearColumns,
    pub rows: Vec<RawRow>,
}

pub struct DataLoader {
    years: Vec<i32>,
    infer_from_header: bool,
}

impl DataLoader {
    /// `infer_from_header` lets year-named header columns override `years`
    pub fn new(years: Vec<i32>, infer_from_header: bool) -> Self {
        Self {
            years,
            infer_from_header,
        }
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadedTable> {
        let path = path.as_ref();
        info!("Loading {}", path.display());
        let file = std::fs::File::open(path)?;
        self.load_reader(file)
    }

    pub fn load_reader(&self, source: impl Read) -> Result<LoadedTable> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let columns = if self.infer_from_header {
            YearColumns::resolve(&header, &self.years)?
        } else {
            YearColumns::new(self.years.clone())?.checked_against(&header)?
        };
        info!("Tracking years {:?}", columns.years());

        let classifier = RowClassifier::new(columns.len());
        let mut rows = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let line = record
                .position()
                .map_or(idx + 2, |position| position.line() as usize);
            let fields: Vec<&str> = record.iter().collect();
            rows.push(classifier.classify(line, &fields)?);
        }

        info!("Classified {} rows", rows.len());
        Ok(LoadedTable {
            header,
            columns,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TmyError;

    const SAMPLE: &str = "Date,2019,2020\n\
                          1-Jan,,\n\
                          0,1.5,2.5\n\
                          1,3.0,4.0\n\
                          ,,\n\
                          2-Jan,,\n\
                          0,5.0,6.0\n";

    #[test]
    fn test_load_with_year_header() {
        let table = DataLoader::new(vec![1999], true)
            .load_reader(SAMPLE.as_bytes())
            .unwrap();

        assert_eq!(table.columns.years(), &[2019, 2020]);
        assert_eq!(table.rows.len(), 5);
        assert!(matches!(table.rows[0], RawRow::DateMarker { ref label, .. } if label == "1-Jan"));
        assert!(matches!(
            table.rows[2],
            RawRow::Values { hour: 1, ref values, .. } if values == &vec![3.0, 4.0]
        ));
    }

    #[test]
    fn test_explicit_years_must_fit_header() {
        let err = DataLoader::new(vec![2019, 2020, 2021], false)
            .load_reader(SAMPLE.as_bytes())
            .unwrap_err();
        assert!(matches!(err, TmyError::ColumnCountMismatch { .. }));
    }

    #[test]
    fn test_line_numbers_in_errors() {
        let input = "Date,A\n1-Jan,\n0,1.0\nabc,2.0\n";
        let err = DataLoader::new(vec![2020], true)
            .load_reader(input.as_bytes())
            .unwrap_err();
        assert!(matches!(err, TmyError::InvalidHour { row: 4, .. }));
    }
}
