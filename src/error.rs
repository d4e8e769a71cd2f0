use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutofillError {
    /// A payload crossing a process or frame boundary failed validation
    #[error("Invalid {context} payload: {reason}")]
    InvalidPayload { context: String, reason: String },

    /// JSON parsing or serialization failed
    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// File read or write failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Preference store rejected an operation
    #[error("Preference store error: {0}")]
    Store(String),

    /// The slow-pass resolver returned something unusable
    #[error("Resolver error: {0}")]
    Resolver(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Frame state machine was asked to make an illegal move
    #[error("Frame '{frame}' cannot go from {from} to {to}")]
    InvalidTransition {
        frame: String,
        from: String,
        to: String,
    },
}

impl AutofillError {
    pub fn invalid_payload(context: impl Into<String>, reason: impl ToString) -> Self {
        AutofillError::InvalidPayload {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        AutofillError::Json {
            context: context.into(),
            source,
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AutofillError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AutofillError>;
