use super::client::BaichuanAdapter;
use super::DEFAULT_FILE_PURPOSE;
use crate::error::InvokeError;
use crate::execution::ExecRequest;
use crate::execution::http::{MultipartFile, MultipartForm};
use crate::traits::FileManagementCapability;
use crate::types::{FileDeleteResponse, FileObject, FileUpload};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
impl FileManagementCapability for BaichuanAdapter {
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
            .send_json(self.authed(ExecRequest::post_multipart(self.url("files"), form)))
            .await?;
        Ok(FileObject::from_json(&raw))
    }

    async fn list_files(&self, purpose: Option<&str>) -> Result<Vec<FileObject>, InvokeError> {
        let raw = self
            .executor
            .send_json(self.authed(ExecRequest::get(self.url("files"))))
            .await?;
        let files = raw
            .get("data")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(FileObject::from_json).collect::<Vec<_>>())
            .unwrap_or_default();
        Ok(match purpose {
            Some(p) => files.into_iter().filter(|f| f.purpose == p).collect(),
            None => files,
        })
    }

    async fn get_file_info(&self, file_id: &str) -> Result<FileObject, InvokeError> {
        let raw = self
            .executor
            .send_json(self.authed(ExecRequest::get(self.url(&format!("files/{file_id}")))))
            .await?;
        Ok(FileObject::from_json(&raw))
    }

    async fn delete_file(&self, file_id: &str) -> Result<FileDeleteResponse, InvokeError> {
        let raw = self
            .executor
            .send_json(self.authed(ExecRequest::delete(self.url(&format!("files/{file_id}")))))
            .await?;
        Ok(FileDeleteResponse {
            id: raw
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or(file_id)
                .to_string(),
            deleted: raw.get("deleted").and_then(Value::as_bool).unwrap_or(false),
        })
    }

    async fn get_file_content(&self, file_id: &str) -> Result<Vec<u8>, InvokeError> {
        self.executor
            .send_bytes(self.authed(ExecRequest::get(
                self.url(&format!("files/{file_id}/content")),
            )))
            .await
    }
}
