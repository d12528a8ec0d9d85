use crate::parquet_export::write_records_parquet;
use crate::tmy_visualization::{render_comparison_chart, ComparisonSeries};
use anyhow::{Context, Result};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use tmy_calculator::export::{self, OutputPaths};
use tmy_calculator::{run_pipeline, DataLoader, TmyConfig, TmyRun};

const OUTPUT_PREFIXES: [&str; 3] = ["processed_", "tmm_results_", "tmy_"];

#[derive(Debug, Clone)]
pub struct StationOutcome {
    pub station: String,
    pub records: usize,
    pub skipped: usize,
    pub representative_years: Vec<i32>, // January through December
}

pub struct StationProcessor {
    input_dir: PathBuf,
    output_dir: PathBuf,
    years: Option<Vec<i32>>,
    render_charts: bool,
    station_pattern: Regex,
}

impl StationProcessor {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            input_dir,
            output_dir,
            years: None,
            render_charts: true,
            station_pattern: Regex::new(r"(?i)^(?P<station>.+?)\s+solar\s+radiation\s+data$")?,
        })
    }

    /// Pin the value-column years instead of reading them from each header
    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = Some(years);
        self
    }

    pub fn with_charts(mut self, render_charts: bool) -> Self {
        self.render_charts = render_charts;
        self
    }

    pub fn process_all(&self) -> Result<Vec<StationOutcome>> {
        println!("☀️  TMY Batch Processor");
        println!("Using {} threads", rayon::current_num_threads());
        println!("{}", "=".repeat(60));

        std::fs::create_dir_all(&self.output_dir)?;
        let files = self.find_station_files()?;
        println!("Found {} station files in {}", files.len(), self.input_dir.display());

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?);

        let results: Vec<(PathBuf, Result<StationOutcome>)> = files
            .par_iter()
            .map(|file| {
                let result = self.process_station(file);
                pb.inc(1);
                (file.clone(), result)
            })
            .collect();

        pb.finish_with_message("Stations processed");

        let mut outcomes = Vec::new();
        let mut failures = 0;
        for (file, result) in results {
            match result {
                Ok(outcome) => {
                    println!(
                        "  ✅ {}: {} records ({} skipped), years {:?}",
                        outcome.station, outcome.records, outcome.skipped, outcome.representative_years
                    );
                    outcomes.push(outcome);
                }
                Err(e) => {
                    error!("Failed to process {}: {:#}", file.display(), e);
                    println!("  ❌ {}: {:#}", file.display(), e);
                    failures += 1;
                }
            }
        }

        println!("\n✅ {} stations processed, {} failed", outcomes.len(), failures);
        Ok(outcomes)
    }

    fn find_station_files(&self) -> Result<Vec<PathBuf>> {
        let pattern = self.input_dir.join("*.csv");
        let mut files: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
            .filter_map(|entry| entry.ok())
            .filter(|path| !is_output_file(path))
            .collect();
        files.sort();
        Ok(files)
    }

    pub fn station_name(&self, path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let name = self
            .station_pattern
            .captures(stem.trim())
            .and_then(|caps| caps.name("station"))
            .map_or(stem.trim(), |m| m.as_str());

        name.split_whitespace().collect::<Vec<_>>().join("_")
    }

    pub fn process_station(&self, file: &Path) -> Result<StationOutcome> {
        let station = self.station_name(file);
        info!("Processing station {} from {}", station, file.display());

        let (years, infer_from_header) = match &self.years {
            Some(years) => (years.clone(), false),
            None => (TmyConfig::default_years().tracked_years, true),
        };

        let table = DataLoader::new(years.clone(), infer_from_header)
            .load_file(file)
            .with_context(|| format!("Failed to load {}", file.display()))?;
        let config = TmyConfig::new(years).with_station(station.clone());
        let run = run_pipeline(&table, &config)
            .with_context(|| format!("TMY selection failed for {}", station))?;

        self.write_outputs(&run)?;

        Ok(StationOutcome {
            station,
            records: run.records.len(),
            skipped: run.skipped.len(),
            representative_years: run
                .selections()
                .iter()
                .map(|s| s.representative_year)
                .collect(),
        })
    }

    fn write_outputs(&self, run: &TmyRun) -> Result<()> {
        let station = &run.config.station;
        let paths = OutputPaths::for_station(&self.output_dir, station);

        export::write_normalized_csv(&paths.normalized, &run.records)?;
        export::write_tmm_csv(&paths.tmm, &run.selections(), &run.config)?;
        export::write_tmy_csv(&paths.tmy, &run.tmy)?;

        write_records_parquet(&paths.normalized.with_extension("parquet"), &run.records)?;
        write_records_parquet(&paths.tmy.with_extension("parquet"), &run.tmy.records)?;

        if self.render_charts {
            let chart_dir = self.output_dir.join("charts");
            std::fs::create_dir_all(&chart_dir)?;
            let chart_path = chart_dir.join(format!("tmy_comparison_{}.png", station));
            render_comparison_chart(&ComparisonSeries::build(&run.records, &run.tmy), &chart_path)?;
        }

        Ok(())
    }
}

fn is_output_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| OUTPUT_PREFIXES.iter().any(|p| name.starts_with(p)))
}
