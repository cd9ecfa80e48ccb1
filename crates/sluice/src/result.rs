//! The result entity: one [`IngestResult`] per ingested file.
//!
//! A result is created by the orchestrator (or by a plugin through
//! `Manager::handle_child`), mutated in place during extraction, and finally
//! handed back to the caller, who owns it from then on. Children are owned
//! exclusively by their parent, and their order is the order in which the
//! delegated plugin discovered them.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lifecycle status of a single ingestion attempt.
///
/// Transitions only move forward: `Pending` becomes exactly one of the three
/// terminal states per ingest call. `Stopped` marks an attempt that was
/// interrupted by an unrecognized error; it never appears on a result that
/// was returned without an accompanying error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Pending,
    Success,
    Failure,
    Stopped,
}

impl IngestStatus {
    /// Whether this status is terminal for the current ingest call.
    pub fn is_terminal(self) -> bool {
        !matches!(self, IngestStatus::Pending)
    }
}

impl Default for IngestStatus {
    fn default() -> Self {
        IngestStatus::Pending
    }
}

/// Extraction state and output for one file.
///
/// `checksum` and `size` are write-once: the orchestrator skips recomputation
/// when they are already populated. `body_text` and `metadata` are written
/// only by the delegated plugin. `children` is append-only during ingestion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestResult {
    /// Path of the underlying file; absent for purely synthetic results.
    pub file_path: Option<PathBuf>,
    /// Display name, usually the final path component.
    pub file_name: Option<String>,
    /// Normalized media type, e.g. `text/plain`.
    pub mime_type: Option<String>,
    /// Hex-encoded content hash.
    pub checksum: Option<String>,
    /// Content length in bytes.
    pub size: Option<u64>,
    pub status: IngestStatus,
    /// Present only when `status` is `Failure`.
    pub error_message: Option<String>,
    /// Extracted text payload, fragments joined by newlines.
    pub body_text: Option<String>,
    /// Free-form payload fields emitted by the plugin.
    pub metadata: HashMap<String, serde_json::Value>,
    /// Child results in discovery order.
    pub children: Vec<IngestResult>,
}

impl IngestResult {
    /// Create an empty, synthetic result with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a result for a file path, deriving `file_name` from its
    /// final component.
    pub fn from_path(path: &Path) -> Self {
        Self {
            file_path: Some(path.to_path_buf()),
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            ..Self::default()
        }
    }

    /// Append a fragment of extracted text to the body.
    ///
    /// Fragments are separated by a single newline; empty fragments are
    /// dropped.
    pub fn emit_text_body(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match &mut self.body_text {
            Some(body) => {
                body.push('\n');
                body.push_str(text);
            }
            None => self.body_text = Some(text.to_string()),
        }
    }

    /// Record an extra payload field.
    pub fn emit_metadata<V: Into<serde_json::Value>>(&mut self, key: &str, value: V) {
        self.metadata.insert(key.to_string(), value.into());
    }
}

impl std::fmt::Display for IngestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file_name, &self.mime_type) {
            (Some(name), Some(mime)) => write!(f, "<{} ({})>", name, mime),
            (Some(name), None) => write!(f, "<{}>", name),
            (None, Some(mime)) => write!(f, "<? ({})>", mime),
            (None, None) => write!(f, "<synthetic>"),
        }
    }
}
