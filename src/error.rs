use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModalError {
    /// More fields were passed to the constructor than a modal can hold.
    #[error("modal can only have up to {max} fields, got {got}")]
    TooManyFields { max: usize, got: usize },

    #[error("cannot add any more fields to this modal (max: {max})")]
    FieldLimitReached { max: usize },

    #[error("field index {index} is out of range for a modal with {len} fields")]
    FieldIndexOutOfRange { index: usize, len: usize },

    #[error("invalid modal submission payload: {0}")]
    InvalidSubmission(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },

    #[error(transparent)]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}
