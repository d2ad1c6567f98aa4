//! Flat-file persistence for named documents: one pretty-printed JSON
//! file per document id inside the store's data directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("document {0:?} not found")]
    NotFound(String),
    #[error("unsupported export format {0:?}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed document file: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry: metadata only, no content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Html,
    Markdown,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Result<Self, StorageError> {
        match name {
            "txt" => Ok(ExportFormat::Text),
            "html" => Ok(ExportFormat::Html),
            "markdown" => Ok(ExportFormat::Markdown),
            other => Err(StorageError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
        }
    }
}

pub struct DocumentStore {
    data_dir: PathBuf,
}

impl DocumentStore {
    /// Opens a store rooted at the given directory, creating it when
    /// missing.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{id}.json"))
    }

    /// Saves a document, allocating a timestamp-derived id when none
    /// is given. `created_at` survives re-saves of an existing id.
    pub fn save(
        &self,
        id: Option<&str>,
        title: &str,
        content: &str,
    ) -> Result<StoredDocument, StorageError> {
        let now = Utc::now();
        let id = match id {
            Some(id) => id.to_string(),
            None => now.format("%Y%m%d%H%M%S").to_string(),
        };
        let created_at = match self.load(&id) {
            Ok(existing) => existing.created_at,
            Err(_) => now,
        };
        let document = StoredDocument {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created_at,
            updated_at: now,
        };
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(self.document_path(&document.id), json)?;
        Ok(document)
    }

    pub fn load(&self, id: &str) -> Result<StoredDocument, StorageError> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// All stored documents, most recently updated first. Entries that
    /// cannot be read or parsed are skipped.
    pub fn list(&self) -> Result<Vec<DocumentSummary>, StorageError> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(StorageError::from)
                .and_then(|raw| Ok(serde_json::from_str::<StoredDocument>(&raw)?));
            match parsed {
                Ok(doc) => summaries.push(DocumentSummary {
                    id: doc.id,
                    title: doc.title,
                    created_at: doc.created_at,
                    updated_at: doc.updated_at,
                }),
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable document file");
                }
            }
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

/// Wraps content for export. Plain text and markdown pass through;
/// HTML gets the fixed document shell with the content escaped.
pub fn export_content(content: &str, format: ExportFormat) -> String {
    match format {
        ExportFormat::Text | ExportFormat::Markdown => content.to_string(),
        ExportFormat::Html => format!(
            "<html><head><title>Exported Document</title></head><body><pre>{}</pre></body></html>",
            escape_html(content)
        ),
    }
}

fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for ch in content.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
