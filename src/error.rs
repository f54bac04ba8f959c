use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdfgvxError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Language Model Error: {0}")]
    Model(String),
}

pub type AdfgvxResult<T> = Result<T, AdfgvxError>;

/// Shorthand for building an `InvalidInput` error from a format string.
macro_rules! invalid_input {
    ($($arg:tt)*) => {
        $crate::error::AdfgvxError::InvalidInput(format!($($arg)*))
    };
}

pub(crate) use invalid_input;
