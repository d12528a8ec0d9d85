use crate::error::Result;
use crate::models::{NormalizedRecord, TmmSelection, TmyConfig, TmySeries};
use csv::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const RECORD_HEADER: [&str; 5] = ["Year", "Month", "Day", "Hour", "Solar Radiation"];

/// Output file locations for one station
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub normalized: PathBuf,
    pub tmm: PathBuf,
    pub tmy: PathBuf,
}

impl OutputPaths {
    pub fn for_station(output_dir: &Path, station: &str) -> Self {
        Self {
            normalized: output_dir.join(format!("processed_{}_solar_data.csv", station)),
            tmm: output_dir.join(format!("tmm_results_{}.csv", station)),
            tmy: output_dir.join(format!("tmy_{}.csv", station)),
        }
    }
}

pub fn write_records<W: Write>(sink: W, records: &[NormalizedRecord]) -> Result<()> {
    let mut writer = Writer::from_writer(sink);
    writer.write_record(RECORD_HEADER)?;

    for record in records {
        writer.write_record(&[
            record.year.to_string(),
            record.month.to_string(),
            record.day.to_string(),
            record.hour.to_string(),
            record.value.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_tmm<W: Write>(sink: W, selections: &[TmmSelection], config: &TmyConfig) -> Result<()> {
    let mut writer = Writer::from_writer(sink);
    writer.write_record([
        "Month".to_string(),
        "Representative Year".to_string(),
        config.tmm_average_header(),
    ])?;

    for selection in selections {
        writer.write_record(&[
            selection.month.to_string(),
            selection.representative_year.to_string(),
            format!("{:.2}", selection.average_value),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_normalized_csv(path: &Path, records: &[NormalizedRecord]) -> Result<()> {
    write_records(std::fs::File::create(path)?, records)
}

pub fn write_tmm_csv(path: &Path, selections: &[TmmSelection], config: &TmyConfig) -> Result<()> {
    write_tmm(std::fs::File::create(path)?, selections, config)
}

pub fn write_tmy_csv(path: &Path, series: &TmySeries) -> Result<()> {
    write_records(std::fs::File::create(path)?, &series.records)
}
