//! Type Conversions for InvokeError
//!
//! From implementations for the error types adapters bubble up with `?`.

use super::types::{ErrorDetail, InvokeError};

impl From<serde_json::Error> for InvokeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Generic(ErrorDetail::new(format!("JSON error: {err}")))
    }
}

impl From<std::io::Error> for InvokeError {
    fn from(err: std::io::Error) -> Self {
        Self::FileIo {
            path: String::new(),
            message: err.to_string(),
        }
    }
}
