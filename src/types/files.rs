//! File management types

use crate::error::InvokeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file stored on the vendor side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    pub filename: String,
    pub bytes: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub purpose: String,
    pub status: Option<String>,
}

impl FileObject {
    /// Decode the common `{id, filename, bytes, created_at, purpose, status}` object.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let str_of = |k: &str| value.get(k).and_then(|v| v.as_str()).map(str::to_string);
        let id = str_of("id")
            .or_else(|| value.get("file_id").map(|v| v.to_string().trim_matches('"').to_string()))
            .unwrap_or_default();
        Self {
            id,
            filename: str_of("filename").unwrap_or_default(),
            bytes: value.get("bytes").and_then(|v| v.as_u64()).unwrap_or(0),
            created_at: value
                .get("created_at")
                .and_then(|v| v.as_i64())
                .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0)),
            purpose: str_of("purpose").unwrap_or_default(),
            status: str_of("status"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDeleteResponse {
    pub id: String,
    pub deleted: bool,
}

/// Upload payload; bytes are read up front.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub content: Vec<u8>,
    pub purpose: String,
    pub mime_type: Option<String>,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, content: Vec<u8>, purpose: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content,
            purpose: purpose.into(),
            mime_type: None,
        }
    }

    /// Read a local file. Failures surface as `FileIo`.
    pub async fn from_path(path: impl AsRef<Path>, purpose: impl Into<String>) -> Result<Self, InvokeError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await.map_err(|e| InvokeError::FileIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_guess::from_path(path).first().map(|m| m.to_string());
        Ok(Self {
            filename,
            content,
            purpose: purpose.into(),
            mime_type,
        })
    }

    pub fn mime_type_or_default(&self) -> String {
        self.mime_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }
}
