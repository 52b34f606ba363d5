use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Frontier is empty")]
    EmptyFrontier,

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl ScanError {
    /// HTTP status associated with the failure, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ScanError::HttpStatus { status, .. } => Some(*status),
            ScanError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
