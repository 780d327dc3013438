//! Local request validation
//!
//! Runs before any network call; failures are `InvalidParameter`.

use crate::error::InvokeError;
use crate::types::Message;

pub fn validate_model(model: &str) -> Result<(), InvokeError> {
    if model.trim().is_empty() {
        return Err(InvokeError::invalid_parameter("model must be a non-empty string"));
    }
    Ok(())
}

/// Non-empty list; every message carries a role and content.
pub fn validate_messages(messages: &[Message]) -> Result<(), InvokeError> {
    if messages.is_empty() {
        return Err(InvokeError::invalid_parameter("messages must not be empty"));
    }
    for (i, m) in messages.iter().enumerate() {
        if m.role.trim().is_empty() {
            return Err(InvokeError::invalid_parameter(format!(
                "messages[{i}] is missing 'role'"
            )));
        }
        if m.content.is_empty() {
            return Err(InvokeError::invalid_parameter(format!(
                "messages[{i}] is missing 'content'"
            )));
        }
    }
    Ok(())
}

pub fn validate_request(model: &str, messages: &[Message]) -> Result<(), InvokeError> {
    validate_model(model)?;
    validate_messages(messages)
}
