use crate::error::{Result, TmyError};
use crate::models::{is_leap_year, NormalizedRecord, RawRow, SkippedRecord, YearColumns};
use chrono::{Datelike, Duration, Month, NaiveDate, Timelike};
use log::{debug, warn};
use std::collections::HashSet;

/// Output of one normalization pass
#[derive(Debug, Clone, Default)]
pub struct NormalizationOutcome {
    pub records: Vec<NormalizedRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// The date label currently in effect while scanning rows
#[derive(Debug, Clone)]
struct DateLabel {
    text: String,
    day_month: Option<(u32, u32)>,
}

impl DateLabel {
    fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            day_month: parse_day_month(text),
        }
    }
}

/// Turns the classified row stream into one record per (value row, tracked year)
pub struct DateNormalizer {
    columns: YearColumns,
}

impl DateNormalizer {
    pub fn new(columns: YearColumns) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &YearColumns {
        &self.columns
    }

    pub fn normalize(&self, rows: &[RawRow]) -> Result<NormalizationOutcome> {
        let mut outcome = NormalizationOutcome {
            records: Vec::with_capacity(rows.len() * self.columns.len()),
            skipped: Vec::new(),
        };
        let mut current: Option<DateLabel> = None;
        let mut reported: HashSet<(String, i32)> = HashSet::new();

        for raw in rows {
            match raw {
                RawRow::DateMarker { label, .. } => {
                    current = Some(DateLabel::parse(label));
                }
                RawRow::Values { row, hour, values } => {
                    let label = current
                        .as_ref()
                        .ok_or(TmyError::MissingDateLabel { row: *row })?;

                    if values.len() != self.columns.len() {
                        return Err(TmyError::ColumnCountMismatch {
                            row: *row,
                            expected: self.columns.len(),
                            found: values.len(),
                        });
                    }

                    for (column, &value) in values.iter().enumerate() {
                        let Some(year) = self.columns.year_at(column) else {
                            continue;
                        };

                        match build_record(label, year, *hour, value) {
                            Some(record) => outcome.records.push(record),
                            None => {
                                if reported.insert((label.text.clone(), year)) {
                                    warn!(
                                        "Invalid date detected: {} for year {}. Skipping...",
                                        label.text, year
                                    );
                                }
                                outcome.skipped.push(SkippedRecord {
                                    row: *row,
                                    label: label.text.clone(),
                                    year,
                                });
                            }
                        }
                    }
                }
            }
        }

        debug!(
            "Normalized {} records, skipped {}",
            outcome.records.len(),
            outcome.skipped.len()
        );

        Ok(outcome)
    }
}

fn build_record(label: &DateLabel, year: i32, hour: u32, value: f64) -> Option<NormalizedRecord> {
    let (day, month) = label.day_month?;

    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        // Feb 29 keeps its slot in non-leap years, zeroed
        if month == 2 && day == 29 && !is_leap_year(year) {
            return Some(NormalizedRecord {
                year,
                month,
                day,
                hour,
                value: 0.0,
            });
        }
        return None;
    };

    let timestamp = date.and_hms_opt(0, 0, 0)? + Duration::hours(i64::from(hour));

    Some(NormalizedRecord {
        year: timestamp.year(),
        month: timestamp.month(),
        day: timestamp.day(),
        hour: timestamp.hour(),
        value,
    })
}

/// Parse a `%d-%b` label such as `15-Jan` into (day, month)
fn parse_day_month(label: &str) -> Option<(u32, u32)> {
    let (day, month) = label.trim().split_once('-')?;
    let day: u32 = day.trim().parse().ok()?;
    let month: Month = month.trim().parse().ok()?;

    if !(1..=31).contains(&day) {
        return None;
    }

    Some((day, month.number_from_month()))
}
