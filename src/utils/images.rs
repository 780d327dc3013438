//! Image inlining
//!
//! Path-sourced image parts are read, base64-encoded and rewritten to
//! base64 sources before a payload is built. Nothing is cached; every
//! request re-reads its files.

use super::mime::detect_media_type;
use crate::error::InvokeError;
use crate::types::{ContentPart, ImageSource, Message, MessageContent};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Rewrite one path source to a base64 source. A caller-supplied media
/// type is kept as is.
pub async fn inline_image_source(source: &ImageSource) -> Result<ImageSource, InvokeError> {
    match source {
        ImageSource::Base64 { .. } => Ok(source.clone()),
        ImageSource::Path { path, media_type } => {
            let bytes = tokio::fs::read(path).await.map_err(|e| InvokeError::FileIo {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let media_type = media_type
                .clone()
                .unwrap_or_else(|| detect_media_type(path, &bytes));
            Ok(ImageSource::Base64 {
                media_type,
                data: STANDARD.encode(&bytes),
            })
        }
    }
}

/// Copy of `messages` with every path image inlined.
pub async fn inline_images(messages: &[Message]) -> Result<Vec<Message>, InvokeError> {
    let mut out = Vec::with_capacity(messages.len());
    for message in messages {
        let content = match &message.content {
            MessageContent::Parts(parts) => {
                let mut inlined = Vec::with_capacity(parts.len());
                for part in parts {
                    inlined.push(match part {
                        ContentPart::Image { source } => ContentPart::Image {
                            source: inline_image_source(source).await?,
                        },
                        other => other.clone(),
                    });
                }
                MessageContent::Parts(inlined)
            }
            text => text.clone(),
        };
        out.push(Message {
            role: message.role.clone(),
            content,
        });
    }
    Ok(out)
}

/// `data:` URL for vendors that take images as URLs.
pub fn data_url(media_type: &str, data: &str) -> String {
    format!("data:{media_type};base64,{data}")
}
