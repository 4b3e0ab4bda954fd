//! File attachments. Only names and sizes ever leave the machine.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions accepted by the attachment picker (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "xls", "xlsx", "jpg", "png", "rtf",
];

/// File reference recorded on a sent user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size_label: String,
}

/// A selected file that has not been sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub name: String,
    pub size_bytes: u64,
}

impl PendingAttachment {
    /// Build a pending attachment, rejecting extensions outside [`ALLOWED_EXTENSIONS`].
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Result<Self> {
        let name = name.into();
        let ext = Path::new(&name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(Error::validation_with_context(
                format!("unsupported attachment type: {}", name),
                ErrorContext::new()
                    .with_details(format!("allowed: {}", ALLOWED_EXTENSIONS.join(", ")))
                    .with_source("attachments"),
            ));
        }
        Ok(Self { name, size_bytes })
    }

    /// Read name and size from a file on disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(Error::validation_with_context(
                "attachment is not a regular file",
                ErrorContext::new().with_field_path(path.display().to_string()),
            ));
        }
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::validation("attachment has no usable file name"))?;
        Self::new(name, meta.len())
    }

    /// Kilobytes rounded to a whole number, e.g. `12 КБ`.
    pub fn size_label(&self) -> String {
        format!("{:.0} КБ", self.size_bytes as f64 / 1024.0)
    }

    pub fn to_attachment(&self) -> Attachment {
        Attachment {
            name: self.name.clone(),
            size_label: self.size_label(),
        }
    }
}
