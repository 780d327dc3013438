//! Capability traits
//!
//! `GenerationCapability` is required; everything else is optional and
//! reached through the `as_*_capability` accessors on [`ProviderAdapter`].

pub mod adapter;
pub mod capabilities;
pub mod embedding;
pub mod files;
pub mod generation;
pub mod model_listing;

pub use adapter::ProviderAdapter;
pub use capabilities::ProviderCapabilities;
pub use embedding::EmbeddingCapability;
pub use files::FileManagementCapability;
pub use generation::GenerationCapability;
pub use model_listing::{ModelListingCapability, find_model};
