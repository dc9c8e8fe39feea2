use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Result, SwanError};
use crate::fs;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Request payload, which also decides the `Content-Type`
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// No payload; still announced as JSON
    Empty,
    Json(serde_json::Value),
    Form(FormBody),
    Multipart(MultipartUpload),
}

impl RequestBody {
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(|e| SwanError::RequestBuild(e.to_string()))
    }
}

/// URL-encoded form fields, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    pairs: Vec<(String, String)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Append the field only when a value is present
    pub fn field_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(key, value.to_string()),
            None => self,
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.encode())
    }
}

/// A manifest file plus scalar fields sent as `multipart/form-data`
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    pub file_field: String,
    pub file_path: PathBuf,
    pub fields: BTreeMap<String, String>,
}

impl MultipartUpload {
    pub fn new(file_path: impl Into<PathBuf>, fields: BTreeMap<String, String>) -> Self {
        Self {
            file_field: "file".to_string(),
            file_path: file_path.into(),
            fields,
        }
    }

    /// Build the form: the file part first, then one text part per field
    pub async fn into_form(self) -> Result<Form> {
        let manifest = fs::read_manifest(&self.file_path).await?;

        let file_part = Part::bytes(manifest.bytes)
            .file_name(manifest.name)
            .mime_str(mime::APPLICATION_OCTET_STREAM.as_ref())
            .map_err(|e| SwanError::RequestBuild(e.to_string()))?;

        let mut form = Form::new().part(self.file_field, file_part);
        for (key, value) in self.fields {
            form = form.text(key, value);
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_form_body_encoding_keeps_order() {
        let form = FormBody::new()
            .field("status", "ImportFailed")
            .field("note", "piece cid mismatch & retry")
            .field_opt("file_size", Some(1024u64))
            .field_opt::<String>("file_path", None);

        assert_eq!(form.keys(), vec!["status", "note", "file_size"]);
        assert_eq!(
            form.encode(),
            "status=ImportFailed&note=piece%20cid%20mismatch%20%26%20retry&file_size=1024"
        );
    }

    #[test]
    fn test_json_body() {
        let body = RequestBody::json(&serde_json::json!({"apikey": "k"})).unwrap();
        match body {
            RequestBody::Json(value) => assert_eq!(value["apikey"], "k"),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multipart_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let upload = MultipartUpload::new(temp_dir.path(), BTreeMap::new());

        let result = upload.into_form().await;
        assert!(matches!(result, Err(SwanError::NotRegularFile { .. })));
    }

    #[tokio::test]
    async fn test_multipart_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let upload = MultipartUpload::new(temp_dir.path().join("none.csv"), BTreeMap::new());

        let result = upload.into_form().await;
        assert!(matches!(result, Err(SwanError::ReadFile { .. })));
    }
}
