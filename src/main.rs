use anyhow::{bail, Result};
use std::path::PathBuf;

mod parquet_export;
mod quality_check;
mod record_reader;
mod station_processor;
mod tmy_visualization;

use station_processor::StationProcessor;
use tmy_calculator::TmySeries;
use tmy_visualization::{render_comparison_chart, ComparisonSeries};

fn print_usage() {
    println!("Usage:");
    println!("  tmy_pipeline --batch <input_dir> [output_dir] [--years 2019,2020,...] [--no-charts]");
    println!("  tmy_pipeline --plot <processed.csv> <tmy.csv> [chart.png]");
    println!("  tmy_pipeline --verify <output_dir>");
}

fn parse_years(value: &str) -> Result<Vec<i32>> {
    let years = value
        .split(',')
        .map(|y| y.trim().parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(years)
}

fn main() -> Result<()> {
    env_logger::init();

    // Set Rayon to use all available cores
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build_global()?;

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 2 && args[1] == "--batch" {
        let input_dir = PathBuf::from(&args[2]);
        let output_dir = match args.get(3) {
            Some(dir) if !dir.starts_with("--") => PathBuf::from(dir),
            _ => PathBuf::from("tmy_output"),
        };

        let mut processor = StationProcessor::new(input_dir, output_dir)?
            .with_charts(!args.iter().any(|arg| arg == "--no-charts"));

        if let Some(idx) = args.iter().position(|arg| arg == "--years") {
            match args.get(idx + 1) {
                Some(value) => processor = processor.with_years(parse_years(value)?),
                None => bail!("--years needs a comma separated list"),
            }
        }

        let start = std::time::Instant::now();
        processor.process_all()?;
        println!("Processing complete in {:?}", start.elapsed());
    } else if args.len() > 3 && args[1] == "--plot" {
        let records = record_reader::read_records(&PathBuf::from(&args[2]))?;
        let tmy = TmySeries {
            records: record_reader::read_records(&PathBuf::from(&args[3]))?,
        };
        let chart_path = args
            .get(4)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("tmy_comparison.png"));

        render_comparison_chart(&ComparisonSeries::build(&records, &tmy), &chart_path)?;
        println!("📊 Chart saved to {}", chart_path.display());
    } else if args.len() > 2 && args[1] == "--verify" {
        let issues = quality_check::verify_output_dir(&PathBuf::from(&args[2]))?;
        if issues > 0 {
            std::process::exit(1);
        }
    } else {
        print_usage();
    }

    Ok(())
}
