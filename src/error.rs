use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, SplitError>;
