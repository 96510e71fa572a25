//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for goldencross.
#[derive(Debug, thiserror::Error)]
pub enum GoldenCrossError {
    #[error("price series is empty")]
    EmptyInput,

    #[error("price dates not strictly increasing at row {index} ({date})")]
    UnsortedDates { index: usize, date: NaiveDate },

    #[error("duplicate price date {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("non-positive price {price} on {date}")]
    NonPositivePrice { date: NaiveDate, price: f64 },

    #[error("price retrieval error: {reason}")]
    DataRetrieval { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GoldenCrossError> for std::process::ExitCode {
    fn from(err: &GoldenCrossError) -> Self {
        let code: u8 = match err {
            GoldenCrossError::Io(_) | GoldenCrossError::Report { .. } => 1,
            GoldenCrossError::ConfigParse { .. } | GoldenCrossError::ConfigInvalid { .. } => 2,
            GoldenCrossError::DataRetrieval { .. } => 3,
            GoldenCrossError::EmptyInput
            | GoldenCrossError::UnsortedDates { .. }
            | GoldenCrossError::DuplicateDate { .. }
            | GoldenCrossError::NonPositivePrice { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
