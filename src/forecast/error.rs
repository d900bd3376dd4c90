use thiserror::Error;

/// Errors that can occur while loading, transforming, or rendering forecasts
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Filesystem error (missing input file, unwritable output dir, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// DataFrame error
    #[error("dataframe error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    /// A required column is absent from the input
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// Nothing left to aggregate or plot
    #[error("empty dataset: {0}")]
    Empty(String),

    /// Figure rendering error
    #[error("render error: {0}")]
    Render(String),
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
