//! Conversation message types

use serde::{Deserialize, Serialize};

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: MessageContent,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new("system", text.into())
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", text.into())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new("assistant", text.into())
    }

    /// A user turn made of explicit parts (text and images).
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self::new("user", MessageContent::Parts(parts))
    }

    /// Concatenated text of every text part.
    pub fn text(&self) -> String {
        self.content.text()
    }
}

/// Either a plain string or an ordered list of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for MessageContent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MessageContent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(value: Vec<ContentPart>) -> Self {
        Self::Parts(value)
    }
}

impl MessageContent {
    /// True for an empty string or an empty part list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(t) => t.is_empty(),
            Self::Parts(p) => p.is_empty(),
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Parts view; plain text is presented as a single text part.
    pub fn parts(&self) -> Vec<ContentPart> {
        match self {
            Self::Text(t) => vec![ContentPart::text(t.clone())],
            Self::Parts(p) => p.clone(),
        }
    }

    pub fn has_images(&self) -> bool {
        matches!(self, Self::Parts(p) if p.iter().any(|part| matches!(part, ContentPart::Image { .. })))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { source: ImageSource },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image part referencing a local file; inlined before transmission.
    pub fn image_path(path: impl Into<String>) -> Self {
        Self::Image {
            source: ImageSource::Path {
                path: path.into(),
                media_type: None,
            },
        }
    }

    pub fn image_base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Image {
            source: ImageSource::Base64 {
                media_type: media_type.into(),
                data: data.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Path {
        path: String,
        #[serde(
            default,
            alias = "mediaType",
            skip_serializing_if = "Option::is_none"
        )]
        media_type: Option<String>,
    },
    Base64 {
        #[serde(alias = "mediaType")]
        media_type: String,
        data: String,
    },
}

impl ImageSource {
    pub fn media_type(&self) -> Option<&str> {
        match self {
            Self::Path { media_type, .. } => media_type.as_deref(),
            Self::Base64 { media_type, .. } => Some(media_type),
        }
    }
}
