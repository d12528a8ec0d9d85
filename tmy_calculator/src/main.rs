use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use tmy_calculator::diagnostics::year_comparisons;
use tmy_calculator::export::{self, OutputPaths};
use tmy_calculator::models::DEFAULT_RADIATION_UNIT;
use tmy_calculator::{run_pipeline, DataLoader, TmyConfig, TmyRun};

#[derive(Parser)]
#[command(name = "tmy_calculator")]
#[command(about = "Derive a Typical Meteorological Year from multi-year hourly solar radiation")]
struct Args {
    /// Wide input table: date labels and hourly rows, one value column per year
    #[arg(short, long)]
    input: PathBuf,

    /// Tracked years in column order (comma separated). Defaults to the
    /// header's year columns, or 2019-2023
    #[arg(short, long, value_delimiter = ',')]
    years: Option<Vec<i32>>,

    /// First tracked year (used with --last-year)
    #[arg(long, requires = "last_year", conflicts_with = "years")]
    first_year: Option<i32>,

    /// Last tracked year (used with --first-year)
    #[arg(long, requires = "first_year")]
    last_year: Option<i32>,

    /// Station name used in output file names (defaults to the input file stem)
    #[arg(short, long)]
    station: Option<String>,

    /// Directory for the normalized, TMM and TMY tables
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Radiation unit shown in the TMM table header
    #[arg(long, default_value = DEFAULT_RADIATION_UNIT)]
    unit: String,

    /// Print results only, do not write output files
    #[arg(long)]
    no_write: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Summary,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("Starting TMY calculation");

    // Explicit years pin the column order; otherwise the header may supply it
    let (years, infer_from_header) = match (&args.years, args.first_year, args.last_year) {
        (Some(years), _, _) => (years.clone(), false),
        (None, Some(first), Some(last)) => {
            if first > last {
                bail!("--first-year {} is after --last-year {}", first, last);
            }
            ((first..=last).collect(), false)
        }
        _ => (TmyConfig::default_years().tracked_years, true),
    };

    let station = match &args.station {
        Some(station) => station.clone(),
        None => args
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.replace(' ', "_"))
            .unwrap_or_else(|| "station".to_string()),
    };

    let mut config = TmyConfig::new(years.clone()).with_station(station);
    config.radiation_unit = args.unit.clone();

    let table = DataLoader::new(years, infer_from_header)
        .load_file(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let run = run_pipeline(&table, &config)?;

    if !args.no_write {
        std::fs::create_dir_all(&args.output_dir)?;
        let paths = OutputPaths::for_station(&args.output_dir, &run.config.station);

        export::write_normalized_csv(&paths.normalized, &run.records)?;
        export::write_tmm_csv(&paths.tmm, &run.selections(), &run.config)?;
        export::write_tmy_csv(&paths.tmy, &run.tmy)?;
        info!(
            "Wrote {}, {} and {}",
            paths.normalized.display(),
            paths.tmm.display(),
            paths.tmy.display()
        );
    }

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&run)?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            export::write_tmm(std::io::stdout().lock(), &run.selections(), &run.config)?;
        }
        OutputFormat::Summary => print_summary(&run),
    }

    Ok(())
}

fn print_summary(run: &TmyRun) {
    println!("Typical Meteorological Month (TMM) Results: {}", run.config.station);
    println!("===================");
    println!("Tracked years: {:?}", run.config.tracked_years);
    println!(
        "Records: {} normalized, {} skipped, {} in TMY",
        run.records.len(),
        run.skipped.len(),
        run.tmy.len()
    );
    println!();
    println!(
        "{:>5}  {:>19}  {}",
        "Month",
        "Representative Year",
        run.config.tmm_average_header()
    );

    for evaluation in &run.evaluations {
        println!(
            "{:>5}  {:>19}  {:.2}",
            evaluation.month,
            evaluation.selection.representative_year,
            evaluation.selection.average_value
        );
    }

    println!();
    println!("FS statistic by year:");
    let comparisons = year_comparisons(&run.records);

    for evaluation in &run.evaluations {
        println!("  Month {}:", evaluation.month);
        for score in &evaluation.fs_by_year {
            let stats = comparisons
                .iter()
                .find(|c| c.month == evaluation.month && c.year == score.year);
            let marker = if score.year == evaluation.selection.representative_year {
                "*"
            } else {
                " "
            };

            match stats {
                Some(stats) => println!(
                    "   {} {}: FS {:.4}  mean {:.2}  std dev {:.2}",
                    marker, score.year, score.fs_statistic, stats.mean, stats.std_dev
                ),
                None => println!("   {} {}: FS {:.4}", marker, score.year, score.fs_statistic),
            }
        }
    }
}
