//! Multipart/form-data encoding for parameter sets that carry uploads

use fbgraph_core::{GraphError, GraphResult, ParamValue, Params, UploadSource};
use reqwest::multipart::{Form, Part};

/// One field of a multipart body
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartEntry {
    Text(String),
    File {
        bytes: Vec<u8>,
        content_type: String,
        filename: Option<String>,
    },
}

/// Multipart body ready to be attached to a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    entries: Vec<(String, MultipartEntry)>,
}

impl MultipartBody {
    pub fn entries(&self) -> &[(String, MultipartEntry)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&MultipartEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, entry)| entry)
    }

    /// Convert into a reqwest form; reqwest sets the boundary and content type
    pub fn into_form(self) -> GraphResult<Form> {
        let mut form = Form::new();
        for (name, entry) in self.entries {
            form = match entry {
                MultipartEntry::Text(value) => form.text(name, value),
                MultipartEntry::File {
                    bytes,
                    content_type,
                    filename,
                } => {
                    let mut part = Part::bytes(bytes).mime_str(&content_type).map_err(|e| {
                        GraphError::Configuration(format!(
                            "Invalid MIME type '{}': {}",
                            content_type, e
                        ))
                    })?;
                    if let Some(filename) = filename {
                        part = part.file_name(filename);
                    }
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// Multipart encoder for Graph requests
pub struct MultipartEncoder;

impl MultipartEncoder {
    /// True iff at least one parameter is an upload
    pub fn requires_multipart(params: &Params) -> bool {
        params.has_uploads()
    }

    /// Replace every upload with its file part and keep scalars as text fields
    pub async fn encode(params: Params) -> GraphResult<MultipartBody> {
        let mut entries = Vec::with_capacity(params.len());
        for (name, value) in params {
            let entry = match value {
                ParamValue::Upload(upload) => {
                    let (source, content_type, filename) = upload.into_parts();
                    let bytes = match source {
                        UploadSource::Bytes(bytes) => bytes,
                        UploadSource::Path(path) => tokio::fs::read(&path).await?,
                    };
                    MultipartEntry::File {
                        bytes,
                        content_type,
                        filename,
                    }
                }
                scalar => MultipartEntry::Text(scalar.form_value().unwrap_or_default()),
            };
            entries.push((name, entry));
        }
        Ok(MultipartBody { entries })
    }
}
