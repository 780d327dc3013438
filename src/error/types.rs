//! Error types

use std::fmt;
use std::time::Duration;

/// Discriminant of an [`InvokeError`], for callers that only need to branch
/// on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Timeout,
    RateLimit,
    Authorization,
    BadRequest,
    ServerUnavailable,
    ModelNotFound,
    InvalidParameter,
    UnsupportedOperation,
    FileIo,
    Generic,
}

/// Payload shared by the HTTP-derived error variants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDetail {
    /// Human-readable message.
    pub message: String,
    /// Vendor error code, when the response body carried one.
    pub error_code: Option<String>,
    /// HTTP status of the failed response.
    pub http_status: Option<u16>,
    /// Structured context (parsed body, provider id, request ids).
    pub details: Option<serde_json::Value>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.error_code = code;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The single error family returned by every adapter and by the facade.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvokeError {
    #[error("Connection error: {0}")]
    Connection(ErrorDetail),

    #[error("Request timed out: {0}")]
    Timeout(ErrorDetail),

    #[error("Rate limit exceeded: {detail}")]
    RateLimit {
        detail: ErrorDetail,
        retry_after: Option<Duration>,
    },

    #[error("Authorization error: {0}")]
    Authorization(ErrorDetail),

    #[error("Bad request: {0}")]
    BadRequest(ErrorDetail),

    #[error("Server unavailable: {0}")]
    ServerUnavailable(ErrorDetail),

    #[error("Model not found: {detail}")]
    ModelNotFound {
        detail: ErrorDetail,
        /// Filled in by the facade after a successful model listing.
        available_models: Option<Vec<String>>,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(ErrorDetail),

    #[error("Method '{operation}' not implemented for provider: {provider}")]
    UnsupportedOperation { provider: String, operation: String },

    #[error("File I/O error for {path}: {message}")]
    FileIo { path: String, message: String },

    #[error("API error: {0}")]
    Generic(ErrorDetail),
}

impl InvokeError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(ErrorDetail::new(message))
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(ErrorDetail::new(message))
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(ErrorDetail::new(message))
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic(ErrorDetail::new(message))
    }

    pub fn model_not_found(detail: ErrorDetail) -> Self {
        Self::ModelNotFound {
            detail,
            available_models: None,
        }
    }

    pub fn unsupported(provider: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            provider: provider.into(),
            operation: operation.into(),
        }
    }

    /// Build the variant for `kind` around an HTTP-derived detail.
    /// Kinds without a detail payload fall back to `Generic`.
    pub fn from_kind(kind: ErrorKind, detail: ErrorDetail) -> Self {
        match kind {
            ErrorKind::Connection => Self::Connection(detail),
            ErrorKind::Timeout => Self::Timeout(detail),
            ErrorKind::RateLimit => Self::RateLimit {
                detail,
                retry_after: None,
            },
            ErrorKind::Authorization => Self::Authorization(detail),
            ErrorKind::BadRequest => Self::BadRequest(detail),
            ErrorKind::ServerUnavailable => Self::ServerUnavailable(detail),
            ErrorKind::ModelNotFound => Self::model_not_found(detail),
            ErrorKind::InvalidParameter => Self::InvalidParameter(detail),
            ErrorKind::UnsupportedOperation | ErrorKind::FileIo | ErrorKind::Generic => {
                Self::Generic(detail)
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) => ErrorKind::Connection,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::ServerUnavailable(_) => ErrorKind::ServerUnavailable,
            Self::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Self::FileIo { .. } => ErrorKind::FileIo,
            Self::Generic(_) => ErrorKind::Generic,
        }
    }

    /// The detail payload, for variants that carry one.
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Connection(d)
            | Self::Timeout(d)
            | Self::Authorization(d)
            | Self::BadRequest(d)
            | Self::ServerUnavailable(d)
            | Self::InvalidParameter(d)
            | Self::Generic(d) => Some(d),
            Self::RateLimit { detail, .. } | Self::ModelNotFound { detail, .. } => Some(detail),
            Self::UnsupportedOperation { .. } | Self::FileIo { .. } => None,
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Self::UnsupportedOperation { .. } => self.to_string(),
            Self::FileIo { path, message } => format!("{path}: {message}"),
            _ => self
                .detail()
                .map(|d| d.message.clone())
                .unwrap_or_default(),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        self.detail().and_then(|d| d.http_status)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.detail().and_then(|d| d.error_code.as_deref())
    }

    pub fn details(&self) -> Option<&serde_json::Value> {
        self.detail().and_then(|d| d.details.as_ref())
    }

    /// `Retry-After` hint; only ever set on `RateLimit`.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Model identifiers attached by the facade's model-not-found enrichment.
    pub fn available_models(&self) -> Option<&[String]> {
        match self {
            Self::ModelNotFound {
                available_models, ..
            } => available_models.as_deref(),
            _ => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }
}
