use thiserror::Error;

#[derive(Error, Debug)]
pub enum WealthError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Scenario '{id}' not found")]
    ScenarioNotFound { id: String },

    #[error("Scenario name must not be empty")]
    EmptyScenarioName,

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Scenario store lock poisoned")]
    StorePoisoned,

    #[error("Scenario store task failed: {0}")]
    StoreTask(#[from] tokio::task::JoinError),
}

pub type WealthResult<T> = Result<T, WealthError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Unparseable flags, `--help` and `--version`; `main` hands these back to clap.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("{0}")]
    Invalid(String),
}
