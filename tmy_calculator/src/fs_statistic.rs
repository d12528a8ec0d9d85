use crate::error::{Result, TmyError};
use crate::models::{
    MonthEvaluation, NormalizedRecord, TmmSelection, YearColumns, YearScore, DEFAULT_FS_EPSILON,
};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Hour of day -> mean value
pub type HourlyProfile = BTreeMap<u32, f64>;

/// Finkelstein-Schafer selection of the typical year for each calendar month
pub struct FsStatisticEngine {
    years: Vec<i32>, // Ascending, so exact ties resolve to the earliest year
    epsilon: f64,
}

impl FsStatisticEngine {
    pub fn new(columns: &YearColumns) -> Self {
        Self {
            years: columns.sorted_years(),
            epsilon: DEFAULT_FS_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// One selection per month, January through December
    pub fn select_representative_years(
        &self,
        records: &[NormalizedRecord],
    ) -> Result<Vec<TmmSelection>> {
        Ok(self
            .evaluate_all(records)?
            .into_iter()
            .map(|evaluation| evaluation.selection)
            .collect())
    }

    /// Evaluate all twelve months. Every month must have records.
    pub fn evaluate_all(&self, records: &[NormalizedRecord]) -> Result<Vec<MonthEvaluation>> {
        let mut by_month: BTreeMap<u32, Vec<NormalizedRecord>> = BTreeMap::new();
        for record in records {
            by_month.entry(record.month).or_insert_with(Vec::new).push(*record);
        }

        if let Some(month) = (1..=12u32).find(|m| !by_month.contains_key(m)) {
            return Err(TmyError::NoDataForMonth(month));
        }

        let evaluations = (1..=12u32)
            .into_par_iter()
            .map(|month| self.evaluate_month(month, &by_month[&month]))
            .collect::<Result<Vec<_>>>()?;

        info!("Selected representative years for {} months", evaluations.len());
        Ok(evaluations)
    }

    /// Score every tracked year against the long-term profile of `month`.
    /// Records belonging to other months or untracked years are ignored.
    pub fn evaluate_month(
        &self,
        month: u32,
        records: &[NormalizedRecord],
    ) -> Result<MonthEvaluation> {
        let month_records: Vec<&NormalizedRecord> = records
            .iter()
            .filter(|r| r.month == month && self.years.contains(&r.year))
            .collect();

        if month_records.is_empty() {
            return Err(TmyError::NoDataForMonth(month));
        }

        let long_term = hourly_profile(month_records.iter().copied());
        let range = profile_range(&long_term) + self.epsilon;

        let mut scores = Vec::with_capacity(self.years.len());
        for &year in &self.years {
            let candidate =
                hourly_profile(month_records.iter().copied().filter(|r| r.year == year));
            let fs_statistic = fs_statistic(month, year, &long_term, &candidate, range)?;

            debug!("Month {} year {}: FS = {:.6}", month, year, fs_statistic);
            scores.push(YearScore { year, fs_statistic });
        }

        let best = select_minimum(&scores).ok_or(TmyError::NoTrackedYears)?;

        let (sum, count) = month_records
            .iter()
            .filter(|r| r.year == best.year)
            .fold((0.0, 0usize), |(sum, count), r| (sum + r.value, count + 1));

        Ok(MonthEvaluation {
            month,
            selection: TmmSelection {
                month,
                representative_year: best.year,
                average_value: sum / count as f64,
            },
            fs_by_year: scores,
        })
    }
}

/// Mean value per hour of day over the given records
pub fn hourly_profile<'a>(records: impl Iterator<Item = &'a NormalizedRecord>) -> HourlyProfile {
    let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(record.hour).or_insert((0.0, 0));
        entry.0 += record.value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(hour, (sum, count))| (hour, sum / count as f64))
        .collect()
}

fn profile_range(profile: &HourlyProfile) -> f64 {
    let max = profile.values().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = profile.values().copied().fold(f64::INFINITY, f64::min);
    max - min
}

/// Sum of range-normalized absolute deviations over the long-term hours.
/// A long-term hour missing from the candidate is a data error.
fn fs_statistic(
    month: u32,
    year: i32,
    long_term: &HourlyProfile,
    candidate: &HourlyProfile,
    range: f64,
) -> Result<f64> {
    long_term.iter().try_fold(0.0, |acc, (&hour, &mean)| {
        let value = candidate
            .get(&hour)
            .ok_or(TmyError::MissingHour { month, year, hour })?;
        Ok(acc + (mean - value).abs() / range)
    })
}

/// First strict minimum in scan order
fn select_minimum(scores: &[YearScore]) -> Option<YearScore> {
    scores.iter().copied().fold(None, |best, score| match best {
        Some(current) if current.fs_statistic <= score.fs_statistic => Some(current),
        _ => Some(score),
    })
}
