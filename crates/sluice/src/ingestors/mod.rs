//! Built-in ingestors.
//!
//! These cover the formats the orchestrator needs out of the box: plain
//! text, XML-family markup (including SVG), OCR-backed images, ZIP archives,
//! and the reserved directory handler. Everything else comes in through the
//! registry.

pub mod archive;
pub mod directory;
pub mod image;
pub mod markup;
pub mod text;

use crate::plugin::IngestorFactory;
use std::sync::Arc;

/// Factories registered by default, in auction precedence order.
///
/// The directory handler is deliberately absent: it is reserved and routed
/// to directly by the orchestrator, never auctioned.
pub fn builtin_factories() -> Vec<Arc<dyn IngestorFactory>> {
    vec![
        Arc::new(markup::MarkupFactory),
        Arc::new(archive::ZipFactory),
        Arc::new(image::ImageFactory),
        Arc::new(text::PlainTextFactory),
    ]
}
