//! ZIP archive ingestor.
//!
//! Each archive member is staged into a scratch directory and handed back to
//! the orchestrator as a child result, preserving archive order. The scratch
//! directory is either the caller-supplied work path or an owned temporary
//! directory released in `cleanup`.

use crate::error::SluiceError;
use crate::manager::{ChildFields, Manager};
use crate::mime::ZIP_MIME_TYPE;
use crate::plugin::{match_mime, Ingestor, IngestorFactory};
use crate::result::IngestResult;
use crate::Result;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

pub struct ZipFactory;

impl IngestorFactory for ZipFactory {
    fn name(&self) -> &str {
        "zip-archive"
    }

    fn match_score(&self, _file_path: &Path, result: &IngestResult) -> i32 {
        match_mime(result, &[ZIP_MIME_TYPE], 3)
    }

    fn create(&self, work_path: Option<&Path>) -> Box<dyn Ingestor> {
        Box::new(ZipIngestor {
            work_path: work_path.map(Path::to_path_buf),
            scratch: None,
        })
    }
}

pub struct ZipIngestor {
    work_path: Option<PathBuf>,
    scratch: Option<TempDir>,
}

impl ZipIngestor {
    /// Root directory for staged members. Lazily creates an owned temporary
    /// directory when no work path was supplied.
    fn scratch_root(&mut self) -> Result<PathBuf> {
        if let Some(path) = &self.work_path {
            return Ok(path.clone());
        }
        if self.scratch.is_none() {
            self.scratch = Some(tempfile::tempdir()?);
        }
        Ok(self
            .scratch
            .as_ref()
            .map(|dir| dir.path().to_path_buf())
            .unwrap_or_default())
    }
}

impl Ingestor for ZipIngestor {
    fn ingest(&mut self, manager: &Manager, result: &mut IngestResult, file_path: &Path) -> Result<()> {
        let root = self.scratch_root()?;
        let reader = File::open(file_path)?;
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| SluiceError::processing(format!("Cannot open ZIP archive: {}", e)))?;

        let mut member_count = 0usize;
        for i in 0..archive.len() {
            let mut member = archive
                .by_index(i)
                .map_err(|e| SluiceError::processing(format!("Cannot read ZIP entry: {}", e)))?;
            if member.is_dir() {
                continue;
            }
            let name = member.name().to_string();
            // Members are flattened under an index prefix, so colliding or
            // path-traversing names inside the archive stay contained.
            let file_name = member
                .enclosed_name()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| format!("member-{}", i));
            let staged = root.join(format!("{:04}-{}", i, file_name));
            let mut out = File::create(&staged)?;
            std::io::copy(&mut member, &mut out)
                .map_err(|e| SluiceError::processing(format!("Cannot extract ZIP entry {}: {}", name, e)))?;
            drop(member);

            member_count += 1;
            manager.handle_child(
                result,
                &staged,
                ChildFields {
                    file_name: Some(name),
                    ..ChildFields::default()
                },
            )?;
        }

        result.emit_metadata("member_count", member_count);
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if let Some(dir) = self.scratch.take() {
            dir.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManagerConfig;
    use crate::result::IngestStatus;
    use std::io::Write;
    use zip::write::{FileOptions, ZipWriter};

    fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::<'_, ()>::default();
        for (name, body) in members {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_score_for_zip_mime() {
        let factory = ZipFactory;
        let mut result = IngestResult::new();
        result.mime_type = Some(ZIP_MIME_TYPE.to_string());
        assert_eq!(factory.match_score(Path::new("a.zip"), &result), 3);
        result.mime_type = Some("text/plain".to_string());
        assert_eq!(factory.match_score(Path::new("a.txt"), &result), 0);
    }

    #[test]
    fn test_members_become_children_in_archive_order() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("bundle.zip");
        write_zip(
            &archive_path,
            &[
                ("zeta.txt", b"last alphabetically"),
                ("alpha.txt", b"first alphabetically"),
            ],
        );

        let manager = Manager::new(ManagerConfig::new());
        let result = manager.ingest(&archive_path).unwrap();

        assert_eq!(result.status, IngestStatus::Success);
        assert_eq!(result.children.len(), 2);
        // Archive order, not name order.
        assert_eq!(result.children[0].file_name.as_deref(), Some("zeta.txt"));
        assert_eq!(result.children[1].file_name.as_deref(), Some("alpha.txt"));
        assert_eq!(
            result.children[0].body_text.as_deref(),
            Some("last alphabetically")
        );
        assert_eq!(result.metadata["member_count"], 2);
    }

    #[test]
    fn test_nested_member_keeps_archived_name() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("nested.zip");
        write_zip(&archive_path, &[("docs/readme.txt", b"nested body")]);

        let manager = Manager::new(ManagerConfig::new());
        let result = manager.ingest(&archive_path).unwrap();

        assert_eq!(result.children.len(), 1);
        assert_eq!(
            result.children[0].file_name.as_deref(),
            Some("docs/readme.txt")
        );
        assert_eq!(result.children[0].body_text.as_deref(), Some("nested body"));
    }

    #[test]
    fn test_corrupt_archive_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("broken.zip");
        std::fs::write(&bogus, b"PK\x03\x04 definitely not a zip").unwrap();

        let mut ingestor = ZipFactory.create(None);
        let manager = Manager::new(ManagerConfig::new());
        let mut result = IngestResult::from_path(&bogus);
        let err = ingestor.ingest(&manager, &mut result, &bogus).unwrap_err();
        assert!(err.is_processing());
        ingestor.cleanup().unwrap();
    }

    #[test]
    fn test_failed_member_does_not_fail_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("mixed.zip");
        write_zip(
            &archive_path,
            &[
                ("good.txt", b"readable"),
                ("blob.bin", &[0u8, 159, 146, 150]),
            ],
        );

        let manager = Manager::new(ManagerConfig::new());
        let result = manager.ingest(&archive_path).unwrap();

        assert_eq!(result.status, IngestStatus::Success);
        assert_eq!(result.children.len(), 2);
        assert_eq!(result.children[0].status, IngestStatus::Success);
        assert_eq!(result.children[1].status, IngestStatus::Failure);
    }

    #[test]
    fn test_cleanup_releases_owned_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("one.zip");
        write_zip(&archive_path, &[("note.txt", b"scratch me")]);

        let mut ingestor = ZipFactory.create(None);
        let manager = Manager::new(ManagerConfig::new());
        let mut result = IngestResult::from_path(&archive_path);
        ingestor.ingest(&manager, &mut result, &archive_path).unwrap();

        let staged = result.children[0].file_path.clone().unwrap();
        assert!(staged.exists());
        ingestor.cleanup().unwrap();
        assert!(!staged.exists());
    }
}
