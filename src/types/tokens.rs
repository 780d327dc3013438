use serde::{Deserialize, Serialize};

/// How a token count was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCountQuality {
    /// Reported by a vendor tokenizer endpoint.
    Exact,
    /// Local word-split approximation.
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub tokens: u32,
    pub quality: TokenCountQuality,
}

impl TokenCount {
    pub fn exact(tokens: u32) -> Self {
        Self {
            tokens,
            quality: TokenCountQuality::Exact,
        }
    }

    pub fn estimated(tokens: u32) -> Self {
        Self {
            tokens,
            quality: TokenCountQuality::Estimated,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.quality == TokenCountQuality::Exact
    }
}
