//! Media library uploads
//!
//! Files are posted as multipart parts named `files` to `/upload`. An
//! optional [`UploadTarget`] links the uploaded files to a field of an
//! existing entry.

use super::documents::StrapiClient;
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::query::DocumentQuery;
use crate::types::JsonObject;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::debug;

/// Route of the upload endpoint
pub const UPLOAD_ROUTE: &str = "upload";

/// Route listing uploaded files
pub const UPLOADED_FILES_ROUTE: &str = "upload/files";

/// Multipart field carrying file parts
const FILES_FIELD: &str = "files";

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file ready to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl FilePayload {
    /// Read a file from disk; the MIME type is guessed from its name
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::FileNotFound {
                path: path.display().to_string(),
            })?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        Ok(Self::from_bytes(name, bytes))
    }

    /// Wrap in-memory content; the MIME type is guessed from the name
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = guess_mime_type(&name);
        Self {
            name,
            bytes,
            mime_type,
        }
    }

    /// Override the guessed MIME type
    #[must_use]
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    fn into_part(self) -> Result<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.name)
            .mime_str(&self.mime_type)?)
    }
}

/// MIME type for a file name, `application/octet-stream` when unknown
pub fn guess_mime_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string()
}

/// Entry field the uploaded files are attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Content type UID (e.g. `api::article.article`)
    pub reference: String,
    /// Id of the entry
    pub ref_id: u64,
    /// Field of the entry
    pub field: String,
}

impl UploadTarget {
    pub fn new(reference: impl Into<String>, ref_id: u64, field: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ref_id,
            field: field.into(),
        }
    }

    fn apply(&self, form: Form) -> Form {
        form.text("ref", self.reference.clone())
            .text("refId", self.ref_id.to_string())
            .text("field", self.field.clone())
    }
}

impl StrapiClient {
    /// Upload files to the media library
    pub async fn upload_files(
        &self,
        files: Vec<FilePayload>,
        target: Option<&UploadTarget>,
    ) -> Result<Vec<JsonObject>> {
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            form = form.part(FILES_FIELD, file.into_part()?);
        }
        if let Some(target) = target {
            form = target.apply(form);
        }

        debug!("Uploading {} file(s)", count);
        let response = self
            .http
            .multipart(UPLOAD_ROUTE, form, RequestConfig::new())
            .await?;
        let uploaded: Vec<JsonObject> = response.json().await.map_err(Error::Http)?;
        Ok(uploaded)
    }

    /// Upload exactly one file
    pub async fn upload_file(
        &self,
        file: FilePayload,
        target: Option<&UploadTarget>,
    ) -> Result<JsonObject> {
        let mut uploaded = self.upload_files(vec![file], target).await?;
        if uploaded.len() != 1 {
            return Err(Error::UnexpectedUploadCount {
                count: uploaded.len(),
            });
        }
        Ok(uploaded.remove(0))
    }

    /// List files of the media library
    pub async fn get_uploaded_files(&self, query: &DocumentQuery) -> Result<Vec<JsonObject>> {
        self.http
            .get_json(
                UPLOADED_FILES_ROUTE,
                RequestConfig::new().params(query.to_params()),
            )
            .await
    }
}
