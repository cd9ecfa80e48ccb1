//! The ingestor plugin contract.
//!
//! A plugin is described by an [`IngestorFactory`]: a cheap, shareable
//! descriptor that bids in the auction via [`IngestorFactory::match_score`]
//! and builds a fresh [`Ingestor`] instance per delegation. The instance does
//! the actual extraction and releases its resources in
//! [`Ingestor::cleanup`], which the orchestrator invokes exactly once per
//! delegation on every exit path.

use crate::manager::Manager;
use crate::result::IngestResult;
use crate::Result;
use std::path::Path;

/// Descriptor for a registered ingestor.
///
/// Factories must be `Send + Sync`; they are shared read-only across
/// managers once registered.
pub trait IngestorFactory: Send + Sync {
    /// Unique name, lowercase with hyphens.
    fn name(&self) -> &str;

    /// Estimate fitness for a file. Pure and side-effect free.
    ///
    /// Zero or negative means "cannot handle". The auction resolves exact
    /// ties in favor of the earliest registration, so a factory only needs
    /// to outscore, not merely equal, the incumbent.
    fn match_score(&self, file_path: &Path, result: &IngestResult) -> i32;

    /// Build a fresh instance for one delegation, optionally bound to a
    /// scratch work area.
    fn create(&self, work_path: Option<&Path>) -> Box<dyn Ingestor>;
}

/// One extraction run.
pub trait Ingestor {
    /// Perform extraction, mutating `result` in place.
    ///
    /// Container ingestors expand nested artifacts through
    /// [`Manager::handle_child`]; a failed child does not have to abort the
    /// parent.
    fn ingest(&mut self, manager: &Manager, result: &mut IngestResult, file_path: &Path) -> Result<()>;

    /// Release any resources opened during construction or ingestion.
    ///
    /// Called exactly once after `ingest` returns, whatever the outcome.
    /// Errors are logged by the orchestrator and never mask the extraction
    /// outcome.
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Score helper for mime-list based factories.
///
/// Returns `score` when the result's mime type matches one of `mime_types`
/// exactly or via a `prefix/*` pattern, and 0 otherwise.
pub fn match_mime(result: &IngestResult, mime_types: &[&str], score: i32) -> i32 {
    let Some(mime) = result.mime_type.as_deref() else {
        return 0;
    };
    for candidate in mime_types {
        let matched = match candidate.strip_suffix("*") {
            Some(prefix) => mime.starts_with(prefix),
            None => *candidate == mime,
        };
        if matched {
            return score;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_mime(mime: &str) -> IngestResult {
        let mut result = IngestResult::new();
        result.mime_type = Some(mime.to_string());
        result
    }

    #[test]
    fn test_match_mime_exact() {
        let result = result_with_mime("text/plain");
        assert_eq!(match_mime(&result, &["text/plain"], 2), 2);
        assert_eq!(match_mime(&result, &["text/html"], 2), 0);
    }

    #[test]
    fn test_match_mime_wildcard() {
        let result = result_with_mime("image/png");
        assert_eq!(match_mime(&result, &["image/*"], 3), 3);
        assert_eq!(match_mime(&result, &["text/*"], 3), 0);
    }

    #[test]
    fn test_match_mime_unset() {
        let result = IngestResult::new();
        assert_eq!(match_mime(&result, &["text/plain", "text/*"], 2), 0);
    }
}
