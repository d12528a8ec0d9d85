use crate::record_reader::read_records;
use anyhow::Result;
use glob::glob;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tmy_calculator::diagnostics::{uneven_months, year_comparisons};
use tmy_calculator::NormalizedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Normalized,
    Tmy,
}

/// Count (Year, Month, Day, Hour) keys that occur more than once
pub fn duplicate_keys(records: &[NormalizedRecord]) -> usize {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| !seen.insert((r.year, r.month, r.day, r.hour)))
        .count()
}

/// Issues in a single table; normalized tables must have uniform per-month
/// counts across years, TMY tables must be month-ascending with one year
/// per month
pub fn check_records(records: &[NormalizedRecord], kind: TableKind) -> Vec<String> {
    let mut issues = Vec::new();

    let duplicates = duplicate_keys(records);
    if duplicates > 0 {
        issues.push(format!("{} duplicate (Year, Month, Day, Hour) entries", duplicates));
    }

    match kind {
        TableKind::Normalized => {
            for (month, counts) in uneven_months(&year_comparisons(records)) {
                issues.push(format!("month {} has uneven record counts {:?}", month, counts));
            }
        }
        TableKind::Tmy => {
            if records.windows(2).any(|pair| pair[1].month < pair[0].month) {
                issues.push("months are not in ascending order".to_string());
            }
            for month in 1..=12 {
                let years: BTreeSet<i32> = records
                    .iter()
                    .filter(|r| r.month == month)
                    .map(|r| r.year)
                    .collect();
                if years.len() > 1 {
                    issues.push(format!("month {} mixes years {:?}", month, years));
                }
            }
        }
    }

    issues
}

pub fn verify_output_dir(dir: &Path) -> Result<usize> {
    println!("\n🔍 TMY Output Verification");
    println!("{}", "=".repeat(60));

    let mut total_issues = 0;

    for (pattern, kind) in [
        ("processed_*_solar_data.csv", TableKind::Normalized),
        ("tmy_*.csv", TableKind::Tmy),
    ] {
        let full_pattern = dir.join(pattern);
        let files: Vec<PathBuf> = glob(&full_pattern.to_string_lossy())?
            .filter_map(|entry| entry.ok())
            .collect();

        if files.is_empty() {
            continue;
        }

        println!("\n📁 Checking {} files matching {}", files.len(), pattern);

        for file in files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("\n  Verifying: {}", name);

            let records = match read_records(&file) {
                Ok(records) => records,
                Err(e) => {
                    println!("    ❌ {:#}", e);
                    total_issues += 1;
                    continue;
                }
            };

            let issues = check_records(&records, kind);
            if issues.is_empty() {
                println!("    ✅ No issues found");
            } else {
                for issue in &issues {
                    println!("    ⚠️  {}", issue);
                }
                total_issues += issues.len();
            }
            println!("    📊 Total records: {}", records.len());
        }
    }

    println!("\n{}", "=".repeat(60));
    if total_issues == 0 {
        println!("✅ Verification passed! No issues found.");
    } else {
        println!("⚠️  Verification found {} issues", total_issues);
    }

    Ok(total_issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, month: u32, day: u32, hour: u32) -> NormalizedRecord {
        NormalizedRecord {
            year,
            month,
            day,
            hour,
            value: 1.0,
        }
    }

    #[test]
    fn test_duplicates() {
        let records = vec![record(2019, 1, 1, 0), record(2019, 1, 1, 0), record(2020, 1, 1, 0)];
        assert_eq!(duplicate_keys(&records), 1);
    }

    #[test]
    fn test_clean_normalized_table() {
        let records = vec![record(2019, 1, 1, 0), record(2020, 1, 1, 0)];
        assert!(check_records(&records, TableKind::Normalized).is_empty());
    }

    #[test]
    fn test_uneven_normalized_table() {
        let records = vec![record(2019, 1, 1, 0), record(2019, 1, 1, 1), record(2020, 1, 1, 0)];
        let issues = check_records(&records, TableKind::Normalized);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("month 1"));
    }

    #[test]
    fn test_tmy_ordering_and_mixed_years() {
        let records = vec![record(2019, 2, 1, 0), record(2020, 1, 1, 0), record(2021, 1, 2, 0)];
        let issues = check_records(&records, TableKind::Tmy);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_verify_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        tmy_calculator::export::write_normalized_csv(
            &dir.path().join("processed_A_solar_data.csv"),
            &[record(2019, 1, 1, 0), record(2020, 1, 1, 0)],
        )
        .unwrap();
        tmy_calculator::export::write_tmy_csv(
            &dir.path().join("tmy_A.csv"),
            &tmy_calculator::TmySeries {
                records: vec![record(2019, 1, 1, 0), record(2019, 1, 1, 0)],
            },
        )
        .unwrap();

        assert_eq!(verify_output_dir(dir.path()).unwrap(), 1);
    }
}
