//! Export of the latest assistant answer as a downloadable file.

use crate::types::Message;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const FILE_STEM: &str = "jurbot-response";
pub const MIME_TYPE: &str = "text/plain;charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Text, ExportFormat::Markdown, ExportFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Text),
            "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::validation_with_context(
                format!("unknown export format: {}", other),
                ErrorContext::new().with_details("expected txt, md or json"),
            )),
        }
    }
}

/// JSON export shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub response: String,
    pub time: String,
}

/// A file ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

impl ExportArtifact {
    /// Write the artifact into `dir` and return the full path.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Serialize one message in the chosen format.
pub fn export_message(message: &Message, format: ExportFormat) -> Result<ExportArtifact> {
    let content = match format {
        ExportFormat::Text => message.text().to_string(),
        ExportFormat::Json => serde_json::to_string_pretty(&ExportRecord {
            response: message.text().to_string(),
            time: message.timestamp().to_string(),
        })?,
        ExportFormat::Markdown => format!(
            "# Ответ ЮрБот\n\n{}\n\n---\n_{}_",
            message.text(),
            message.timestamp()
        ),
    };
    Ok(ExportArtifact {
        file_name: format!("{}.{}", FILE_STEM, format.extension()),
        mime_type: MIME_TYPE,
        content,
    })
}

/// Export the most recent assistant message, if there is one.
pub fn export_latest(messages: &[Message], format: ExportFormat) -> Result<Option<ExportArtifact>> {
    messages
        .iter()
        .rev()
        .find(|m| m.is_assistant())
        .map(|m| export_message(m, format))
        .transpose()
}
