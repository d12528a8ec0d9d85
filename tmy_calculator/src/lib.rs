pub mod assembler;
pub mod data_loader;
pub mod date_normalizer;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod fs_statistic;
pub mod models;
pub mod pipeline;
pub mod row_classifier;

pub use assembler::TmyAssembler;
pub use data_loader::{DataLoader, LoadedTable};
pub use date_normalizer::{DateNormalizer, NormalizationOutcome};
pub use error::{Result, TmyError};
pub use fs_statistic::FsStatisticEngine;
pub use models::{NormalizedRecord, RawRow, TmmSelection, TmyConfig, TmySeries, YearColumns};
pub use pipeline::{run_pipeline, TmyRun};
pub use row_classifier::RowClassifier;
