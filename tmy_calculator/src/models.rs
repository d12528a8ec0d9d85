use crate::error::{Result, TmyError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_FS_EPSILON: f64 = 1e-10;
pub const DEFAULT_RADIATION_UNIT: &str = "MJ/m²";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmyConfig {
    pub tracked_years: Vec<i32>,
    pub fs_epsilon: f64, // Guards the range division for flat months
    pub station: String,
    pub radiation_unit: String,
}

impl TmyConfig {
    pub fn new(tracked_years: Vec<i32>) -> Self {
        Self {
            tracked_years,
            fs_epsilon: DEFAULT_FS_EPSILON,
            station: "station".to_string(),
            radiation_unit: DEFAULT_RADIATION_UNIT.to_string(),
        }
    }

    /// Five consecutive years, 2019 through 2023
    pub fn default_years() -> Self {
        Self::new((2019..=2023).collect())
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = station.into();
        self
    }

    pub fn tmm_average_header(&self) -> String {
        format!("Average Solar Radiation ({})", self.radiation_unit)
    }
}

/// Explicit mapping from value-column position to calendar year.
///
/// Built once per input table so every value row is zipped against the same,
/// already validated year order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearColumns {
    years: Vec<i32>,
}

impl YearColumns {
    pub fn new(years: Vec<i32>) -> Result<Self> {
        if years.is_empty() {
            return Err(TmyError::NoTrackedYears);
        }

        let mut seen = HashSet::new();
        for &year in &years {
            if !seen.insert(year) {
                return Err(TmyError::DuplicateYear(year));
            }
        }

        Ok(Self { years })
    }

    /// Use the header's value-column names when all of them are years,
    /// otherwise fall back to `fallback`. Either way the column count must
    /// match the header.
    pub fn resolve(header: &[String], fallback: &[i32]) -> Result<Self> {
        let value_headers = header.get(1..).unwrap_or_default();

        let from_header: Option<Vec<i32>> = if value_headers.is_empty() {
            None
        } else {
            value_headers.iter().map(|h| parse_year_header(h)).collect()
        };

        Self::new(from_header.unwrap_or_else(|| fallback.to_vec()))?.checked_against(header)
    }

    /// Fail when the header's value-column count disagrees with the years.
    /// An empty header carries no shape information and always passes.
    pub fn checked_against(self, header: &[String]) -> Result<Self> {
        let value_columns = header.len().saturating_sub(1);
        if value_columns > 0 && value_columns != self.len() {
            return Err(TmyError::ColumnCountMismatch {
                row: 0,
                expected: self.len(),
                found: value_columns,
            });
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn year_at(&self, column: usize) -> Option<i32> {
        self.years.get(column).copied()
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Tracked years in ascending order, the order ties are broken in
    pub fn sorted_years(&self) -> Vec<i32> {
        let mut years = self.years.clone();
        years.sort_unstable();
        years
    }
}

fn parse_year_header(header: &str) -> Option<i32> {
    let trimmed = header.trim();
    if trimmed.len() != 4 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// One classified input row
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    /// Day/month label such as `15-Jan`, no year attached
    DateMarker { row: usize, label: String },
    /// Hour of day plus one value per tracked year, in column order
    Values { row: usize, hour: u32, values: Vec<f64> },
}

impl RawRow {
    pub fn row(&self) -> usize {
        match self {
            RawRow::DateMarker { row, .. } | RawRow::Values { row, .. } => *row,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub value: f64,
}

/// A `(label, year)` combination that could not be turned into a calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub row: usize,
    pub label: String,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TmmSelection {
    pub month: u32,
    pub representative_year: i32,
    pub average_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearScore {
    pub year: i32,
    pub fs_statistic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthEvaluation {
    pub month: u32,
    pub fs_by_year: Vec<YearScore>, // Ascending year
    pub selection: TmmSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearComparison {
    pub month: u32,
    pub year: i32,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

/// Synthetic year built from the representative month of each calendar month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TmySeries {
    pub records: Vec<NormalizedRecord>,
}

impl TmySeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean value per month, ascending month
    pub fn monthly_means(&self) -> Vec<(u32, f64)> {
        let mut sums = [(0.0_f64, 0_usize); 12];
        for record in &self.records {
            let slot = (record.month as usize)
                .checked_sub(1)
                .and_then(|idx| sums.get_mut(idx));
            if let Some(slot) = slot {
                slot.0 += record.value;
                slot.1 += 1;
            }
        }

        sums.iter()
            .enumerate()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(idx, (sum, count))| (idx as u32 + 1, sum / *count as f64))
            .collect()
    }
}

/// Mean value per (month, year), sorted by month then year
pub fn monthly_means(records: &[NormalizedRecord]) -> Vec<(u32, i32, f64)> {
    let mut groups: std::collections::BTreeMap<(u32, i32), (f64, usize)> =
        std::collections::BTreeMap::new();

    for record in records {
        let entry = groups.entry((record.month, record.year)).or_insert((0.0, 0));
        entry.0 += record.value;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((month, year), (sum, count))| (month, year, sum / count as f64))
        .collect()
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2019));
    }

    #[test]
    fn test_year_columns_from_header() {
        let columns =
            YearColumns::resolve(&header(&["Date", "2019", "2020", "2021"]), &[1990]).unwrap();
        assert_eq!(columns.years(), &[2019, 2020, 2021]);
        assert_eq!(columns.year_at(2), Some(2021));
        assert_eq!(columns.year_at(3), None);
    }

    #[test]
    fn test_year_columns_fallback_must_match_header_width() {
        let err = YearColumns::resolve(&header(&["Date", "A", "B"]), &[2019, 2020, 2021])
            .unwrap_err();
        assert!(matches!(
            err,
            TmyError::ColumnCountMismatch { expected: 3, found: 2, .. }
        ));

        let ok = YearColumns::resolve(&header(&["Date", "A", "B"]), &[2019, 2020]).unwrap();
        assert_eq!(ok.len(), 2);
    }

    #[test]
    fn test_year_columns_rejects_duplicates() {
        assert!(matches!(
            YearColumns::new(vec![2019, 2020, 2019]),
            Err(TmyError::DuplicateYear(2019))
        ));
        assert!(matches!(YearColumns::new(vec![]), Err(TmyError::NoTrackedYears)));
    }

    #[test]
    fn test_tmy_series_monthly_means() {
        let series = TmySeries {
            records: vec![
                NormalizedRecord { year: 2020, month: 3, day: 1, hour: 0, value: 2.0 },
                NormalizedRecord { year: 2020, month: 3, day: 1, hour: 1, value: 4.0 },
                NormalizedRecord { year: 2021, month: 1, day: 1, hour: 0, value: 1.0 },
            ],
        };

        assert_eq!(series.monthly_means(), vec![(1, 1.0), (3, 3.0)]);
    }
}
