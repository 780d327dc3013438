//! ProviderCapabilities structure

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderCapabilities {
    pub generation: bool,
    pub streaming: bool,
    pub vision: bool,
    /// Token counting backed by a vendor endpoint rather than an estimate.
    pub exact_token_count: bool,
    pub model_listing: bool,
    pub embedding: bool,
    pub file_management: bool,
    pub custom_features: HashMap<String, bool>,
}

impl ProviderCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation plus streaming, the baseline every adapter offers.
    pub fn generation() -> Self {
        Self::new().with_generation().with_streaming()
    }

    pub fn with_generation(mut self) -> Self {
        self.generation = true;
        self
    }
    pub fn with_streaming(mut self) -> Self {
        self.streaming = true;
        self
    }
    pub fn with_vision(mut self) -> Self {
        self.vision = true;
        self
    }
    pub fn with_exact_token_count(mut self) -> Self {
        self.exact_token_count = true;
        self
    }
    pub fn with_model_listing(mut self) -> Self {
        self.model_listing = true;
        self
    }
    pub fn with_embedding(mut self) -> Self {
        self.embedding = true;
        self
    }
    pub fn with_file_management(mut self) -> Self {
        self.file_management = true;
        self
    }
    pub fn with_custom_feature(mut self, name: &str, enabled: bool) -> Self {
        self.custom_features.insert(name.to_string(), enabled);
        self
    }

    pub fn supports(&self, feature: &str) -> bool {
        match feature {
            "generation" | "chat" => self.generation,
            "streaming" => self.streaming,
            "vision" => self.vision,
            "exact_token_count" => self.exact_token_count,
            "model_listing" | "list_models" => self.model_listing,
            "embedding" => self.embedding,
            "file_management" | "files" => self.file_management,
            _ => self.custom_features.get(feature).copied().unwrap_or(false),
        }
    }
}
