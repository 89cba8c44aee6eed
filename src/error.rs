/// Pipeline-level errors
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Filtering removed every user or every item. Indicates thresholds that
    /// are too strict for the dataset, not a transient fault; never retried.
    #[error("Empty input after filtering: {0}")]
    EmptyInput(String),

    /// Encoding hit an id with no assigned feature slot. Points at an
    /// index/filter mismatch upstream; fatal, never retried.
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Training job failed: {0}")]
    TrainingJobFailed(String),

    #[error("Serving error: {0}")]
    Serving(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
