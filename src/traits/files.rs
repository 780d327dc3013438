//! File management capability trait

use crate::error::InvokeError;
use crate::types::{FileDeleteResponse, FileObject, FileUpload};
use async_trait::async_trait;

#[async_trait]
pub trait FileManagementCapability: Send + Sync {
    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, InvokeError>;

    /// Files visible to the credentials, optionally narrowed by purpose.
    async fn list_files(&self, purpose: Option<&str>) -> Result<Vec<FileObject>, InvokeError>;

    async fn get_file_info(&self, file_id: &str) -> Result<FileObject, InvokeError>;

    async fn delete_file(&self, file_id: &str) -> Result<FileDeleteResponse, InvokeError>;

    async fn get_file_content(&self, file_id: &str) -> Result<Vec<u8>, InvokeError>;
}
