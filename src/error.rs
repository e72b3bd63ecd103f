use thiserror::Error;

/// Errors raised while building or querying an isolation forest.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    #[error("invalid query argument: {0}")]
    InvalidQueryArgument(String),

    #[error("invalid tree: {0}")]
    InvalidTree(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
