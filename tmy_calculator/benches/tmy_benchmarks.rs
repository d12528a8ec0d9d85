use chrono::{Datelike, Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tmy_calculator::{DataLoader, DateNormalizer, FsStatisticEngine, TmyAssembler};

const YEARS: [i32; 5] = [2019, 2020, 2021, 2022, 2023];

// Five-year wide table over the 2020 calendar, values shaped like a daily
// irradiance curve with a per-year offset
fn synthetic_table() -> String {
    let mut csv = String::from("Date,2019,2020,2021,2022,2023\n");
    let mut date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    while date.year() == 2020 {
        csv.push_str(&format!("{},,,,,\n", date.format("%d-%b")));
        for hour in 0..24u32 {
            csv.push_str(&hour.to_string());
            for (idx, _) in YEARS.iter().enumerate() {
                let daylight = (hour as f64 - 12.0).abs();
                let value = (12.0 - daylight).max(0.0) * (1.0 + idx as f64 * 0.05)
                    + date.ordinal() as f64 * 0.001;
                csv.push_str(&format!(",{:.3}", value));
            }
            csv.push('\n');
        }
        date += Duration::days(1);
    }

    csv
}

fn benchmark_load(c: &mut Criterion) {
    let csv = synthetic_table();
    let loader = DataLoader::new(YEARS.to_vec(), true);

    c.bench_function("load_wide_table", |b| {
        b.iter(|| {
            let _table = black_box(loader.load_reader(csv.as_bytes()).unwrap());
        });
    });
}

fn benchmark_normalize(c: &mut Criterion) {
    let csv = synthetic_table();
    let table = DataLoader::new(YEARS.to_vec(), true)
        .load_reader(csv.as_bytes())
        .unwrap();
    let normalizer = DateNormalizer::new(table.columns.clone());

    c.bench_function("normalize_five_years", |b| {
        b.iter(|| {
            let _outcome = black_box(normalizer.normalize(&table.rows).unwrap());
        });
    });
}

fn benchmark_selection(c: &mut Criterion) {
    let csv = synthetic_table();
    let table = DataLoader::new(YEARS.to_vec(), true)
        .load_reader(csv.as_bytes())
        .unwrap();
    let records = DateNormalizer::new(table.columns.clone())
        .normalize(&table.rows)
        .unwrap()
        .records;
    let engine = FsStatisticEngine::new(&table.columns);

    c.bench_function("select_and_assemble", |b| {
        b.iter(|| {
            let selections = engine.select_representative_years(&records).unwrap();
            let _series = black_box(TmyAssembler::assemble(&selections, &records));
        });
    });
}

criterion_group!(
    benches,
    benchmark_load,
    benchmark_normalize,
    benchmark_selection
);
criterion_main!(benches);
