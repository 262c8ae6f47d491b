use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NgramError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Workbook XML error: {0}")]
    Xml(String),

    #[error("Unsupported input format: {} (expected .xlsx, .xlsm, .csv or .tsv)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    #[error("Column not found: {column:?}")]
    MissingColumn { column: String },

    #[error("No {order}-grams found (input too short or every token was filtered out)")]
    EmptyResults { order: usize },

    #[error("Stopword list unavailable at {}: {source}", path.display())]
    StopwordsUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Writing {} failed: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, NgramError>;
