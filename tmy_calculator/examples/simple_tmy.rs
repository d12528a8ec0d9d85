use tmy_calculator::{run_pipeline, DataLoader, TmyConfig};

fn main() {
    // Three years of a single-day-per-month table: hour 6-18 daylight only
    let mut csv = String::from("Date,2021,2022,2023\n");
    let months = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    for (idx, month) in months.iter().enumerate() {
        csv.push_str(&format!("15-{},,,\n", month));
        for hour in 0..24 {
            let base = if (6..=18).contains(&hour) {
                (6.0 - (hour as f64 - 12.0).abs()) * (1.0 + idx as f64 * 0.1)
            } else {
                0.0
            };
            csv.push_str(&format!(
                "{},{:.2},{:.2},{:.2}\n",
                hour,
                base * 0.9,
                base,
                base * 1.2
            ));
        }
    }

    let table = DataLoader::new(vec![], true)
        .load_reader(csv.as_bytes())
        .expect("sample table is well formed");
    let config = TmyConfig::new(table.columns.years().to_vec()).with_station("Example");
    let run = run_pipeline(&table, &config).expect("every month has data");

    println!("TMY Analysis Results");
    println!("===================");
    println!("Station: {}", run.config.station);
    println!("Tracked years: {:?}", run.config.tracked_years);
    println!();

    for evaluation in &run.evaluations {
        println!(
            "  Month {:>2}: year {} (average {:.2} {})",
            evaluation.month,
            evaluation.selection.representative_year,
            evaluation.selection.average_value,
            run.config.radiation_unit
        );
        for score in &evaluation.fs_by_year {
            println!("      {}: FS {:.4}", score.year, score.fs_statistic);
        }
    }

    println!();
    println!("TMY records: {}", run.tmy.len());
    for (month, mean) in run.tmy.monthly_means() {
        println!("  Month {:>2} mean: {:.3}", month, mean);
    }
}
