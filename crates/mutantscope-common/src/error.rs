use thiserror::Error;

#[derive(Debug, Error)]
pub enum MutantscopeError {
    /// The annotation service returned an empty record list.
    #[error("No data: {0}")]
    NoData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to reach annotation service: {0}")]
    Transport(String),

    #[error("Annotation service returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("Invalid value for threshold '{name}': '{value}' is not a number")]
    InvalidThreshold { name: String, value: String },

    #[error("Unknown threshold: {0}")]
    UnknownThreshold(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MutantscopeError {
    /// True for conditions the user can act on without a retry (empty payload, bad input).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MutantscopeError::NoData(_)
                | MutantscopeError::InvalidInput(_)
                | MutantscopeError::InvalidThreshold { .. }
                | MutantscopeError::UnknownThreshold(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MutantscopeError>;
