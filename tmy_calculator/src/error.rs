#[derive(Debug, thiserror::Error)]
pub enum TmyError {
    #[error("No tracked years configured")]
    NoTrackedYears,

    #[error("Year {0} is tracked more than once")]
    DuplicateYear(i32),

    #[error("Row {row}: expected {expected} value columns, found {found}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: invalid hour '{value}' (expected 0-23)")]
    InvalidHour { row: usize, value: String },

    #[error("Row {row}, column {column}: invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Row {row}: value row appears before any date label")]
    MissingDateLabel { row: usize },

    #[error("No data for month {0}")]
    NoDataForMonth(u32),

    #[error("Month {month}, year {year}: no records for hour {hour}")]
    MissingHour { month: u32, year: i32, hour: u32 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TmyError>;
