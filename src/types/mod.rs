//! Core data types shared by every provider.

pub mod credentials;
pub mod embedding;
pub mod files;
pub mod http;
pub mod message;
pub mod models;
pub mod request;
pub mod response;
pub mod tokens;

pub use credentials::Credentials;
pub use embedding::EmbeddingResponse;
pub use files::{FileDeleteResponse, FileObject, FileUpload};
pub use http::{HttpConfig, HttpConfigBuilder};
pub use message::{ContentPart, ImageSource, Message, MessageContent};
pub use models::ModelInfo;
pub use request::{GenerationOptions, GenerationRequest};
pub use response::{CanonicalChunk, CanonicalResponse, Choice, Usage};
pub use tokens::{TokenCount, TokenCountQuality};
