//! Embedding types

use super::response::Usage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub model: String,
    /// One vector per input, in input order.
    pub embeddings: Vec<Vec<f32>>,
    pub usage: Usage,
}

impl EmbeddingResponse {
    pub fn new(model: impl Into<String>, embeddings: Vec<Vec<f32>>) -> Self {
        Self {
            model: model.into(),
            embeddings,
            usage: Usage::default(),
        }
    }

    /// Parse a JSON array of numbers into a vector.
    pub fn vector_from_json(value: &serde_json::Value) -> Option<Vec<f32>> {
        value
            .as_array()?
            .iter()
            .map(|n| n.as_f64().map(|f| f as f32))
            .collect()
    }
}
