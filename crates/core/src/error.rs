use thiserror::Error;

pub type CreativeResult<T> = Result<T, CreativeError>;

#[derive(Error, Debug)]
pub enum CreativeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown creative format: {0}")]
    UnknownFormat(String),

    #[error("Malformed creative: {0}")]
    MalformedCreative(String),

    #[error("Invalid rule '{rule_id}': {reason}")]
    InvalidRule { rule_id: String, reason: String },

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
