//! Multipart form reading shared by the resume and avatar uploads.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::board::validation::validate_upload;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Type and size checks against `allowed` and `max_bytes`.
    pub fn validate(
        &self,
        field: &str,
        allowed: &[&str],
        max_bytes: usize,
    ) -> Result<(), AppError> {
        validate_upload(field, &self.content_type, self.bytes.len(), allowed, max_bytes)
    }
}

/// Text fields plus the file parts named by the caller.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(multipart: &mut Multipart, file_fields: &[&str]) -> Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            if file_fields.contains(&name.as_str()) {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let declared = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                if bytes.is_empty() && file_name.is_empty() {
                    // browsers send an empty part when no file was chosen
                    continue;
                }
                let file_name = if file_name.is_empty() {
                    "upload".to_string()
                } else {
                    file_name
                };
                let content_type = content_type_for(&file_name, declared.as_deref());
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    },
                );
            } else {
                let text = field.text().await.map_err(malformed)?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    /// Trimmed text value; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}

/// The declared part type, or one inferred from the file extension when the
/// client sent none or a generic one.
fn content_type_for(file_name: &str, declared: Option<&str>) -> String {
    if let Some(declared) = declared.filter(|d| *d != "application/octet-stream") {
        return declared.to_string();
    }
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
    .to_string()
}
