//! Metadata for uploaded files referenced by audit events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// File accepted by an upload handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Name the file was uploaded under.
    pub original_name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Location the upload handler stored the file at.
    pub storage_path: String,
}

impl UploadedFile {
    /// Creates upload metadata.
    #[must_use]
    pub fn new(
        original_name: impl Into<String>,
        size_bytes: u64,
        storage_path: impl Into<String>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            size_bytes,
            storage_path: storage_path.into(),
        }
    }

    /// Returns the audit details recorded for this file.
    #[must_use]
    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        details.insert("fileName".to_owned(), json!(self.original_name));
        details.insert("fileSize".to_owned(), json!(self.size_bytes));
        details.insert("filePath".to_owned(), json!(self.storage_path));
        details
    }
}
