use aws_sdk_acm::error::DisplayErrorContext;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertUtilsError {
    #[error("{0}")]
    Usage(String),

    #[error("AWS API error: {0}")]
    Provider(String),

    #[error("Certificate parsing error: {0}")]
    CertParsing(String),

    #[error("{0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CertUtilsError {
    /// Wrap an SDK failure, keeping the full error chain in the message
    pub fn provider<E>(operation: &str, err: E) -> Self
    where
        E: std::error::Error,
    {
        CertUtilsError::Provider(format!("{operation}: {}", DisplayErrorContext(&err)))
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        CertUtilsError::Usage(msg.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, CertUtilsError::Usage(_))
    }
}

pub type Result<T> = std::result::Result<T, CertUtilsError>;
