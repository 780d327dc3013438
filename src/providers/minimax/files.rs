use super::DEFAULT_FILE_PURPOSE;
use super::client::MinimaxAdapter;
use crate::error::InvokeError;
use crate::execution::ExecRequest;
use crate::execution::http::{MultipartFile, MultipartForm};
use crate::traits::FileManagementCapability;
use crate::types::{FileDeleteResponse, FileObject, FileUpload};
use async_trait::async_trait;
use serde_json::{Value, json};

/// Single-file responses nest the object under `file`.
fn file_of(raw: &Value) -> FileObject {
    FileObject::from_json(raw.get("file").unwrap_or(raw))
}

#[async_trait]
impl FileManagementCapability for MinimaxAdapter {
    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, InvokeError> {
        let purpose = if upload.purpose.is_empty() {
            DEFAULT_FILE_PURPOSE.to_string()
        } else {
            upload.purpose.clone()
        };
        let form = MultipartForm::default().text("purpose", purpose).file(MultipartFile {
            field: "file".into(),
            mime_type: upload.mime_type_or_default(),
            filename: upload.filename,
            content: upload.content,
        });
        let raw = self
            .executor
            .send_json(self.authed(ExecRequest::post_multipart(self.url("files/upload"), form)))
            .await?;
        Ok(file_of(&raw))
    }

    async fn list_files(&self, purpose: Option<&str>) -> Result<Vec<FileObject>, InvokeError> {
        let mut request = ExecRequest::get(self.url("files/list"));
        if let Some(purpose) = purpose {
            request = request.query("purpose", purpose);
        }
        let raw = self.executor.send_json(self.authed(request)).await?;
        Ok(raw
            .get("files")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(FileObject::from_json).collect())
            .unwrap_or_default())
    }

    async fn get_file_info(&self, file_id: &str) -> Result<FileObject, InvokeError> {
        let request = ExecRequest::get(self.url("files/retrieve")).query("file_id", file_id);
        let raw = self.executor.send_json(self.authed(request)).await?;
        Ok(file_of(&raw))
    }

    async fn delete_file(&self, file_id: &str) -> Result<FileDeleteResponse, InvokeError> {
        let request = ExecRequest::post_json(self.url("files/delete"), json!({"file_id": file_id}));
        // A non-zero base_resp has already been rejected by the executor.
        self.executor.send_json(self.authed(request)).await?;
        Ok(FileDeleteResponse {
            id: file_id.to_string(),
            deleted: true,
        })
    }

    async fn get_file_content(&self, file_id: &str) -> Result<Vec<u8>, InvokeError> {
        let request = ExecRequest::get(self.url("files/retrieve_content")).query("file_id", file_id);
        self.executor.send_bytes(self.authed(request)).await
    }
}
