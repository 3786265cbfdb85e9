use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(
        "API server is not configured: set the server address with `planner config set-server <url>`"
    )]
    NotConfigured,

    #[error(
        "Could not reach the server at {url}: check that the server is running and the address is correct"
    )]
    Unreachable {
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("HTTP error! status: {status} ({path})")]
    Status { status: u16, path: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlannerError {
    /// True for failures that happened before or instead of an HTTP response.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::NotConfigured | Self::Unreachable { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
