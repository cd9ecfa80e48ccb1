//! Sluice - File Ingestion Orchestration Library
//!
//! Sluice routes files to pluggable ingestors through a score-based auction,
//! tracks each file's outcome on an ingest result, and recursively ingests
//! the children an ingestor discovers (archive members, directory entries).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sluice::{Manager, ManagerConfig};
//!
//! # fn main() -> sluice::Result<()> {
//! let manager = Manager::new(ManagerConfig::new());
//! let result = manager.ingest("report.xml".as_ref())?;
//! println!("{}: {:?}", result, result.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Manager** (`manager`): auction, delegation, and the result lifecycle
//! - **Plugin System** (`plugin`, `registry`): ingestor factories and the
//!   process-wide registry
//! - **Ingestors** (`ingestors`): built-in handlers for text, markup, images,
//!   ZIP archives, and directories
//! - **OCR** (`ocr`): pluggable text recognition for image content

#![deny(unsafe_code)]

pub mod checksum;
pub mod config;
pub mod error;
pub mod ingestors;
pub mod manager;
pub mod mime;
pub mod ocr;
pub mod plugin;
pub mod registry;
pub mod result;

pub use checksum::checksum_file;
pub use config::ManagerConfig;
pub use error::{Result, SluiceError};
pub use manager::{ChildFields, IngestHooks, Manager, NoopHooks};
pub use mime::{
    normalize_mimetype, sniff_mime, DEFAULT_MIME_TYPE, DIRECTORY_MIME_TYPE, PLAIN_TEXT_MIME_TYPE,
};
pub use ocr::{OcrService, TesseractOcr, DEFAULT_OCR_LANGUAGES};
pub use plugin::{match_mime, Ingestor, IngestorFactory};
pub use registry::{get_ingestor_registry, list_ingestors, register_ingestor, IngestorRegistry};
pub use result::{IngestResult, IngestStatus};
