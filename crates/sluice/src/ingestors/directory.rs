//! Reserved handler for directories.
//!
//! Non-regular files never enter the auction: the orchestrator stamps them
//! with the `inode/directory` sentinel and routes them here. Every directory
//! entry becomes a child result, ingested depth-first in name order.

use crate::manager::{ChildFields, Manager};
use crate::mime::DIRECTORY_MIME_TYPE;
use crate::plugin::{match_mime, Ingestor, IngestorFactory};
use crate::result::IngestResult;
use crate::Result;
use std::path::Path;

pub struct DirectoryFactory;

impl IngestorFactory for DirectoryFactory {
    fn name(&self) -> &str {
        "directory"
    }

    fn match_score(&self, _file_path: &Path, result: &IngestResult) -> i32 {
        // Routed to directly by the orchestrator; the score only matters if
        // an embedder registers this factory into an open registry.
        match_mime(result, &[DIRECTORY_MIME_TYPE], 1)
    }

    fn create(&self, _work_path: Option<&Path>) -> Box<dyn Ingestor> {
        Box::new(DirectoryIngestor)
    }
}

pub struct DirectoryIngestor;

impl Ingestor for DirectoryIngestor {
    fn ingest(&mut self, manager: &Manager, result: &mut IngestResult, file_path: &Path) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(file_path)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        // Name order keeps child ordering reproducible across filesystems.
        entries.sort();

        for path in &entries {
            // A failed child is recorded on the child itself; only
            // unrecognized errors abort the directory walk.
            manager.handle_child(result, path, ChildFields::default())?;
        }

        result.emit_metadata("entry_count", entries.len());
        Ok(())
    }
}
