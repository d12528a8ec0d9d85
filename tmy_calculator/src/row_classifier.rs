use crate::error::{Result, TmyError};
use crate::models::RawRow;

const DATE_SEPARATOR: char = '-';

/// Decides whether a row is a date marker or an hourly value row
pub struct RowClassifier {
    value_columns: usize,
}

impl RowClassifier {
    pub fn new(value_columns: usize) -> Self {
        Self { value_columns }
    }

    /// Classify one row. `row` is the source line number, carried into errors
    /// and diagnostics.
    pub fn classify(&self, row: usize, fields: &[&str]) -> Result<RawRow> {
        let first = fields.first().map(|f| f.trim()).unwrap_or_default();

        if is_date_label(first) {
            return Ok(RawRow::DateMarker {
                row,
                label: first.to_string(),
            });
        }

        let hour = parse_hour(first).ok_or_else(|| TmyError::InvalidHour {
            row,
            value: first.to_string(),
        })?;

        let cells = self.value_cells(row, fields)?;
        let mut values = Vec::with_capacity(cells.len());

        for (idx, cell) in cells.iter().enumerate() {
            let cell = cell.trim();
            let value = cell
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| TmyError::InvalidValue {
                    row,
                    column: idx + 1,
                    value: cell.to_string(),
                })?;
            values.push(value);
        }

        Ok(RawRow::Values { row, hour, values })
    }

    fn value_cells<'a>(&self, row: usize, fields: &'a [&'a str]) -> Result<&'a [&'a str]> {
        let mut cells = fields.get(1..).unwrap_or_default();

        // Spreadsheet exports often pad rows with empty trailing cells
        while cells.len() > self.value_columns
            && cells.last().is_some_and(|c| c.trim().is_empty())
        {
            cells = &cells[..cells.len() - 1];
        }

        if cells.len() != self.value_columns {
            return Err(TmyError::ColumnCountMismatch {
                row,
                expected: self.value_columns,
                found: cells.len(),
            });
        }

        Ok(cells)
    }
}

/// Textual (non-numeric) and containing the day/month separator
fn is_date_label(field: &str) -> bool {
    field.contains(DATE_SEPARATOR) && field.parse::<f64>().is_err()
}

fn parse_hour(field: &str) -> Option<u32> {
    let hour = match field.parse::<u32>() {
        Ok(hour) => hour,
        Err(_) => {
            // "7.0" style integral floats from spreadsheet exports
            let float = field.parse::<f64>().ok()?;
            if float.fract() != 0.0 || float < 0.0 {
                return None;
            }
            float as u32
        }
    };

    (hour < 24).then_some(hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_marker_row() {
        let classifier = RowClassifier::new(3);
        let row = classifier.classify(0, &["15-Jan", "", "", ""]).unwrap();
        assert_eq!(
            row,
            RawRow::DateMarker {
                row: 0,
                label: "15-Jan".to_string()
            }
        );
    }

    #[test]
    fn test_value_row() {
        let classifier = RowClassifier::new(2);
        let row = classifier.classify(4, &["7", "1.5", " 2.25 "]).unwrap();
        assert_eq!(
            row,
            RawRow::Values {
                row: 4,
                hour: 7,
                values: vec![1.5, 2.25]
            }
        );

        let row = classifier.classify(5, &["8.0", "0", "0"]).unwrap();
        assert!(matches!(row, RawRow::Values { hour: 8, .. }));
    }

    #[test]
    fn test_negative_number_is_not_a_date() {
        let classifier = RowClassifier::new(1);
        let err = classifier.classify(2, &["-1", "3.0"]).unwrap_err();
        assert!(matches!(err, TmyError::InvalidHour { row: 2, .. }));
    }

    #[test]
    fn test_hour_out_of_range() {
        let classifier = RowClassifier::new(1);
        assert!(matches!(
            classifier.classify(0, &["24", "1.0"]),
            Err(TmyError::InvalidHour { .. })
        ));
        assert!(matches!(
            classifier.classify(0, &["noon", "1.0"]),
            Err(TmyError::InvalidHour { .. })
        ));
    }

    #[test]
    fn test_column_count_mismatch() {
        let classifier = RowClassifier::new(3);
        let err = classifier.classify(9, &["0", "1.0", "2.0"]).unwrap_err();
        assert!(matches!(
            err,
            TmyError::ColumnCountMismatch {
                row: 9,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_trailing_empty_cells_are_ignored() {
        let classifier = RowClassifier::new(2);
        let row = classifier.classify(0, &["0", "1.0", "2.0", "", " "]).unwrap();
        assert!(matches!(row, RawRow::Values { ref values, .. } if values.len() == 2));
    }

    #[test]
    fn test_invalid_value() {
        let classifier = RowClassifier::new(2);
        let err = classifier.classify(3, &["0", "1.0", "n/a"]).unwrap_err();
        assert!(matches!(err, TmyError::InvalidValue { row: 3, column: 2, .. }));

        let err = classifier.classify(3, &["0", "NaN", "1.0"]).unwrap_err();
        assert!(matches!(err, TmyError::InvalidValue { column: 1, .. }));
    }
}
