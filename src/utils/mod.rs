//! Utility helpers

pub mod images;
pub mod mime;
pub mod options;
pub mod tokens;
pub mod url;
pub mod validation;

pub use images::{data_url, inline_image_source, inline_images};
pub use mime::detect_media_type;
pub use options::filter_options;
pub use tokens::estimate_tokens;
pub use url::join_url;
pub use validation::{validate_messages, validate_model, validate_request};
