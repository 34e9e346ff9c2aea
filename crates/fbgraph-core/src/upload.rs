//! File-like parameter values that must travel as multipart parts

use crate::error::{GraphError, GraphResult};
use std::path::{Path, PathBuf};

/// Where the bytes of an upload come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// Read from disk when the request is encoded
    Path(PathBuf),
    /// Already in memory
    Bytes(Vec<u8>),
}

/// A parameter that is sent as a file part rather than a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadableParameter {
    source: UploadSource,
    content_type: String,
    filename: Option<String>,
}

impl UploadableParameter {
    /// Wrap a file on disk. When `content_type` is `None` it is inferred from
    /// the file extension; unknown extensions are rejected.
    pub fn from_path(path: impl Into<PathBuf>, content_type: Option<&str>) -> GraphResult<Self> {
        let path = path.into();
        let content_type = match content_type {
            Some(ct) => ct.to_string(),
            None => content_type_for(&path).ok_or_else(|| {
                GraphError::Configuration(format!(
                    "cannot determine content type for '{}'",
                    path.display()
                ))
            })?,
        };
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        Ok(Self {
            source: UploadSource::Path(path),
            content_type,
            filename,
        })
    }

    /// Wrap in-memory content
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            source: UploadSource::Bytes(bytes.into()),
            content_type: content_type.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn source(&self) -> &UploadSource {
        &self.source
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn into_parts(self) -> (UploadSource, String, Option<String>) {
        (self.source, self.content_type, self.filename)
    }
}

fn content_type_for(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|mime| mime.essence_str().to_string())
}
