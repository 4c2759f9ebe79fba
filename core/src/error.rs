use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Baseline scenario '{id}' not found in scenario set")]
    BaselineNotFound { id: String },

    #[error("Scenario '{id}' not found")]
    ScenarioNotFound { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
