//! Normalize -> select -> assemble, shared by the single-station CLI and the
//! batch processor.

use crate::assembler::TmyAssembler;
use crate::data_loader::LoadedTable;
use crate::date_normalizer::DateNormalizer;
use crate::error::Result;
use crate::fs_statistic::FsStatisticEngine;
use crate::models::{
    MonthEvaluation, NormalizedRecord, SkippedRecord, TmmSelection, TmyConfig, TmySeries,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// All computed outputs of one station run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmyRun {
    pub config: TmyConfig,
    pub records: Vec<NormalizedRecord>,
    pub skipped: Vec<SkippedRecord>,
    pub evaluations: Vec<MonthEvaluation>,
    pub tmy: TmySeries,
}

impl TmyRun {
    pub fn selections(&self) -> Vec<TmmSelection> {
        self.evaluations.iter().map(|e| e.selection).collect()
    }
}

pub fn run_pipeline(table: &LoadedTable, config: &TmyConfig) -> Result<TmyRun> {
    let normalizer = DateNormalizer::new(table.columns.clone());
    let outcome = normalizer.normalize(&table.rows)?;
    info!(
        "Normalized {} records from {} rows",
        outcome.records.len(),
        table.rows.len()
    );
    if !outcome.skipped.is_empty() {
        warn!("Skipped {} records with invalid dates", outcome.skipped.len());
    }

    let engine = FsStatisticEngine::new(&table.columns).with_epsilon(config.fs_epsilon);
    let evaluations = engine.evaluate_all(&outcome.records)?;

    let selections: Vec<TmmSelection> = evaluations.iter().map(|e| e.selection).collect();
    let tmy = TmyAssembler::assemble(&selections, &outcome.records);

    let mut config = config.clone();
    config.tracked_years = table.columns.years().to_vec();

    Ok(TmyRun {
        config,
        records: outcome.records,
        skipped: outcome.skipped,
        evaluations,
        tmy,
    })
}
