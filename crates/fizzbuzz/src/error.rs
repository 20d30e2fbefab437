use fizzbuzz_core::stats::StoreError;
use fizzbuzz_core::validation::FieldErrors;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(FieldErrors),

    #[error("Statistics storage failed: {0}")]
    Storage(#[from] StoreError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}
