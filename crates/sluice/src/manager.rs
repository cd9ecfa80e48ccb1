//! The ingestion orchestrator.
//!
//! [`Manager`] ties the whole protocol together: it checksums the file,
//! resolves its media type, auctions it to the best-matching ingestor
//! factory, delegates extraction under a managed lifecycle, and finalizes
//! the result's status. Plugins call back into the same manager through
//! [`Manager::handle_child`] to expand nested artifacts, which recurse
//! depth-first through the identical protocol.
//!
//! The protocol is synchronous: the calling thread blocks through checksum,
//! auction, delegation and all recursive child ingestion before an ingest
//! call returns. A result and its children are exclusively owned by that
//! call tree, so no locking is needed beyond the registry's `RwLock`.

use crate::checksum::checksum_file;
use crate::config::ManagerConfig;
use crate::ingestors::directory::DirectoryFactory;
use crate::mime::{is_specific, sniff_mime, DEFAULT_MIME_TYPE, DIRECTORY_MIME_TYPE};
use crate::ocr::{OcrService, TesseractOcr};
use crate::plugin::IngestorFactory;
use crate::registry::{get_ingestor_registry, IngestorRegistry};
use crate::result::{IngestResult, IngestStatus};
use crate::{Result, SluiceError};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Extension hooks for embedding hosts.
///
/// Both callbacks default to no-ops. `before` runs after checksum capture
/// and ahead of the pending transition; `after` always runs last and
/// observes the final status, including `Stopped`.
pub trait IngestHooks: Send + Sync {
    fn before(&self, _result: &mut IngestResult) {}
    fn after(&self, _result: &IngestResult) {}
}

/// Default hook implementation that does nothing.
pub struct NoopHooks;

impl IngestHooks for NoopHooks {}

/// Caller-supplied identity fields for a child result.
///
/// Container plugins use these to carry metadata the filesystem cannot
/// provide, e.g. the original member name inside an archive, or a
/// precomputed checksum for deduplicated storage.
#[derive(Debug, Clone, Default)]
pub struct ChildFields {
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub checksum: Option<String>,
    pub size: Option<u64>,
}

/// Handles the lifecycle of ingestor plugins for one configuration context.
pub struct Manager {
    config: ManagerConfig,
    registry: Arc<RwLock<IngestorRegistry>>,
    hooks: Box<dyn IngestHooks>,
    directory: Arc<DirectoryFactory>,
    ocr: OnceCell<Option<Arc<dyn OcrService>>>,
}

impl Manager {
    /// Create a manager bound to the process-wide ingestor registry.
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            registry: get_ingestor_registry(),
            hooks: Box::new(NoopHooks),
            directory: Arc::new(DirectoryFactory),
            ocr: OnceCell::new(),
        }
    }

    /// Use a private registry instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<RwLock<IngestorRegistry>>) -> Self {
        self.registry = registry;
        self
    }

    /// Install embedding-host hooks.
    pub fn with_hooks(mut self, hooks: Box<dyn IngestHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Inject an OCR service, bypassing lazy resolution.
    pub fn with_ocr_service(self, service: Arc<dyn OcrService>) -> Self {
        let _ = self.ocr.set(Some(service));
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Resolve an option with config > environment > default precedence.
    pub fn get_env(&self, name: &str, default: Option<&str>) -> Option<String> {
        self.config.get_env(name, default)
    }

    /// Resolve the optional OCR capability for this manager.
    ///
    /// The service is constructed once per manager on first request;
    /// construction failure is logged and pins the capability to `None`.
    pub fn ocr_service(&self) -> Option<Arc<dyn OcrService>> {
        self.ocr
            .get_or_init(|| match TesseractOcr::new() {
                Ok(service) => Some(Arc::new(service) as Arc<dyn OcrService>),
                Err(err) => {
                    tracing::info!("OCR service unavailable: {}", err);
                    None
                }
            })
            .clone()
    }

    /// Select the ingestor factory responsible for a file.
    ///
    /// Non-regular files are stamped with the directory sentinel type and
    /// routed to the reserved directory handler without consulting the open
    /// plugin set. Regular files get their media type resolved first, then
    /// every registered factory bids; the highest strictly-positive score
    /// wins, with exact ties going to the earliest registration.
    pub fn auction(&self, file_path: &Path, result: &mut IngestResult) -> Result<Arc<dyn IngestorFactory>> {
        if !file_path.is_file() {
            result.mime_type = Some(DIRECTORY_MIME_TYPE.to_string());
            return Ok(self.directory.clone() as Arc<dyn IngestorFactory>);
        }

        if !is_specific(result.mime_type.as_deref()) {
            result.mime_type = Some(sniff_mime(file_path)?);
        }

        let candidates = {
            let registry = self
                .registry
                .read()
                .map_err(|e| SluiceError::LockPoisoned(format!("ingestor registry: {}", e)))?;
            registry.snapshot()
        };

        let mut best_score = 0;
        let mut best: Option<Arc<dyn IngestorFactory>> = None;
        for factory in candidates {
            let score = factory.match_score(file_path, result);
            if score > best_score {
                best_score = score;
                best = Some(factory);
            }
        }

        best.ok_or_else(|| {
            SluiceError::UnsupportedFormat(
                result
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            )
        })
    }

    /// Run one delegation under the managed lifecycle.
    ///
    /// The instance's `cleanup` is invoked exactly once after `ingest`
    /// returns, whatever the outcome; a cleanup failure is logged and never
    /// masks the extraction outcome. The extraction error, if any, is
    /// returned unchanged.
    pub fn delegate(
        &self,
        factory: &Arc<dyn IngestorFactory>,
        result: &mut IngestResult,
        file_path: &Path,
        work_path: Option<&Path>,
    ) -> Result<()> {
        let mut ingestor = factory.create(work_path);
        let outcome = ingestor.ingest(self, result, file_path);
        if let Err(err) = ingestor.cleanup() {
            tracing::warn!("Cleanup failed for ingestor '{}': {}", factory.name(), err);
        }
        outcome
    }

    /// Ingest a file path into a fresh result entity.
    ///
    /// Returns the completed entity with status `Success` or `Failure`. An
    /// unrecognized error propagates as `Err` instead; the interrupted
    /// entity (status `Stopped`) is only observable through
    /// [`Manager::ingest_into`].
    pub fn ingest(&self, file_path: &Path) -> Result<IngestResult> {
        let mut result = IngestResult::from_path(file_path);
        self.ingest_into(&mut result, file_path, None)?;
        Ok(result)
    }

    /// Main execution step of an ingestion, operating on a caller-owned
    /// entity.
    ///
    /// Status transitions per call: `Pending` then exactly one of
    /// `Success` (clean completion, returns `Ok`), `Failure` (recognized
    /// processing error captured into `error_message`, still returns `Ok`),
    /// or `Stopped` (unrecognized error, returned as `Err`). The `after`
    /// hook runs in every path, observing the final status.
    pub fn ingest_into(
        &self,
        result: &mut IngestResult,
        file_path: &Path,
        work_path: Option<&Path>,
    ) -> Result<()> {
        checksum_file(result, file_path)?;
        self.hooks.before(result);
        result.status = IngestStatus::Pending;
        result.error_message = None;

        let outcome = self.auction(file_path, result).and_then(|factory| {
            tracing::debug!("Ingestor [{}]: {}", result, factory.name());
            self.delegate(&factory, result, file_path, work_path)
        });

        let outcome = match outcome {
            Ok(()) => {
                result.status = IngestStatus::Success;
                Ok(())
            }
            Err(err) if err.is_processing() => {
                result.error_message = Some(err.to_string());
                result.status = IngestStatus::Failure;
                tracing::warn!("Failed [{}]: {}", result, err);
                Ok(())
            }
            Err(err) => Err(err),
        };

        // Always-run finalization: an attempt that never reached a terminal
        // status was interrupted by an unrecognized error.
        if result.status == IngestStatus::Pending {
            result.status = IngestStatus::Stopped;
        }
        self.hooks.after(result);

        outcome
    }

    /// Ingest a nested artifact discovered by a container plugin.
    ///
    /// The child entity is appended to `parent.children` first (preserving
    /// discovery order) and then run through the full ingest protocol in
    /// place. A child `Failure` does not fail the parent; an unrecognized
    /// child error propagates, leaving the `Stopped` child in the parent.
    pub fn handle_child<'p>(
        &self,
        parent: &'p mut IngestResult,
        file_path: &Path,
        fields: ChildFields,
    ) -> Result<&'p IngestResult> {
        let mut child = IngestResult::from_path(file_path);
        if let Some(name) = fields.file_name {
            child.file_name = Some(name);
        }
        if let Some(mime) = fields.mime_type {
            child.mime_type = Some(mime);
        }
        child.checksum = fields.checksum;
        child.size = fields.size;

        parent.children.push(child);
        let index = parent.children.len() - 1;
        self.ingest_into(&mut parent.children[index], file_path, None)?;
        Ok(&parent.children[index])
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}
