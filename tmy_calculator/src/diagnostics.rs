use crate::models::{NormalizedRecord, YearComparison};
use std::collections::BTreeMap;

/// Mean and sample standard deviation of each year's values, per month
pub fn year_comparisons(records: &[NormalizedRecord]) -> Vec<YearComparison> {
    let mut groups: BTreeMap<(u32, i32), Vec<f64>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.month, record.year))
            .or_insert_with(Vec::new)
            .push(record.value);
    }

    groups
        .into_iter()
        .map(|((month, year), values)| {
            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            let std_dev = if count > 1 {
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                    / (count - 1) as f64;
                variance.sqrt()
            } else {
                0.0
            };

            YearComparison {
                month,
                year,
                mean,
                std_dev,
                count,
            }
        })
        .collect()
}

/// Months whose record count differs between years, as (month, [(year, count)])
pub fn uneven_months(comparisons: &[YearComparison]) -> Vec<(u32, Vec<(i32, usize)>)> {
    let mut by_month: BTreeMap<u32, Vec<(i32, usize)>> = BTreeMap::new();
    for comparison in comparisons {
        by_month
            .entry(comparison.month)
            .or_insert_with(Vec::new)
            .push((comparison.year, comparison.count));
    }

    by_month
        .into_iter()
        .filter(|(_, counts)| counts.windows(2).any(|pair| pair[0].1 != pair[1].1))
        .collect()
}
