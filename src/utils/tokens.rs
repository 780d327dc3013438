//! Local token estimation

use crate::types::{Message, TokenCount};

/// Whitespace-separated words across all text parts, at least 1 for a
/// non-empty message list.
pub fn estimate_tokens(messages: &[Message]) -> TokenCount {
    let words: usize = messages
        .iter()
        .map(|m| m.text().split_whitespace().count())
        .sum();
    let tokens = if messages.is_empty() { 0 } else { words.max(1) };
    TokenCount::estimated(u32::try_from(tokens).unwrap_or(u32::MAX))
}
