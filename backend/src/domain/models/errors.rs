/// Malformed window input, rejected before any read is attempted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
    #[error("Invalid month: {0}. Expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid range: {0}. Expected day, week or month")]
    InvalidRange(String),
    #[error("Window ends before it starts")]
    Inverted,
    #[error("Window must span at least one day")]
    Empty,
}

/// Failure of a calendar or dashboard aggregation
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    #[error(transparent)]
    Window(#[from] WindowError),
    /// Any of the reads failed; there is no partial result
    #[error("Could not load data")]
    Storage(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} is too long")]
    FieldTooLong(&'static str),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Amount must be a positive number")]
    NonPositiveAmount,
    #[error("{0} already exists")]
    Duplicate(&'static str),
}

/// Failure of a single-record operation (create, update, delete, check-in)
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] RecordValidationError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Storage error: {0}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::Storage(err)
    }
}
