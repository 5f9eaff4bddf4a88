use crate::core::types::Operation;
use thiserror::Error;

/// Boxed error used where the underlying cause comes from a pluggable component
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum KycError {
    #[error("Failed to parse private key: {0}")]
    KeyParse(String),

    #[error("Failed to sign payload: {0}")]
    Signing(String),

    #[error("Invalid request params: {0}")]
    InvalidParams(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("HTTP request for {operation} failed after {attempts} attempt(s): {source}")]
    HttpFailure {
        operation: Operation,
        attempts: u32,
        #[source]
        source: BoxError,
    },

    #[error("Unexpected HTTP status for {operation}: status={status} body={body}")]
    UnexpectedStatus {
        operation: Operation,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {operation} response: {message}")]
    Decode {
        operation: Operation,
        message: String,
    },

    #[error("{operation} rejected by partner API: {code} - {message}")]
    DomainRejection {
        operation: Operation,
        code: i32,
        message: String,
    },

    #[error("Request for {operation} was cancelled")]
    Cancelled { operation: Operation },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

impl KycError {
    /// HTTP status carried by this error, including the final status of a
    /// 5xx response that exhausted its retries
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::HttpFailure { source, .. } => source
                .downcast_ref::<Self>()
                .and_then(|inner| inner.status_code()),
            _ => None,
        }
    }

    /// Operation that produced this error, when one was in flight
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::HttpFailure { operation, .. }
            | Self::UnexpectedStatus { operation, .. }
            | Self::Decode { operation, .. }
            | Self::DomainRejection { operation, .. }
            | Self::Cancelled { operation } => Some(*operation),
            _ => None,
        }
    }

    /// True when the remote service or the network was unavailable, as
    /// opposed to the request being malformed or rejected
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::HttpFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_from_exhausted_server_error() {
        let inner = KycError::UnexpectedStatus {
            operation: Operation::SubmitKyc,
            status: 503,
            body: "unavailable".to_string(),
        };
        let err = KycError::HttpFailure {
            operation: Operation::SubmitKyc,
            attempts: 4,
            source: Box::new(inner),
        };

        assert_eq!(err.status_code(), Some(503));
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("after 4 attempt(s)"));
    }

    #[test]
    fn test_status_code_absent_for_transport_failure() {
        let err = KycError::HttpFailure {
            operation: Operation::GetKycInformation,
            attempts: 1,
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )),
        };

        assert_eq!(err.status_code(), None);
        assert_eq!(err.operation(), Some(Operation::GetKycInformation));
    }

    #[test]
    fn test_decode_error_names_operation() {
        let err = KycError::Decode {
            operation: Operation::SubmitKyc,
            message: "unexpected end of input".to_string(),
        };

        assert_eq!(err.operation(), Some(Operation::SubmitKyc));
        assert!(err.to_string().contains("submit-kyc"));
        assert!(KycError::KeyParse("bad".to_string()).operation().is_none());
    }
}
