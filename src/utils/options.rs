use crate::types::GenerationOptions;
use serde_json::{Map, Value};

/// Keep the allow-listed options; log the names of the rest.
/// Dropped keys are never an error.
pub fn filter_options(
    provider: &str,
    options: &GenerationOptions,
    allowed: &[&str],
) -> Map<String, Value> {
    let (kept, dropped) = options.filter(allowed);
    if !dropped.is_empty() {
        tracing::debug!(
            target: "onesdk::options",
            provider,
            dropped = ?dropped,
            "ignoring options outside the allow-list"
        );
    }
    kept
}
