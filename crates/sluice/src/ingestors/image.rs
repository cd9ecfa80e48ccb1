//! Image ingestor backed by the optional OCR capability.

use crate::manager::Manager;
use crate::ocr::DEFAULT_OCR_LANGUAGES;
use crate::plugin::{match_mime, Ingestor, IngestorFactory};
use crate::result::IngestResult;
use crate::{Result, SluiceError};
use std::path::Path;

/// Option key for the OCR language list (engine syntax, e.g. `eng+deu`).
pub const OCR_LANGUAGES_OPTION: &str = "OCR_LANGUAGES";

pub struct ImageFactory;

impl IngestorFactory for ImageFactory {
    fn name(&self) -> &str {
        "image-ocr"
    }

    fn match_score(&self, _file_path: &Path, result: &IngestResult) -> i32 {
        // SVG is markup, not pixels; the markup factory outbids this score,
        // so no carve-out is needed here.
        match_mime(result, &["image/*"], 2)
    }

    fn create(&self, _work_path: Option<&Path>) -> Box<dyn Ingestor> {
        Box::new(ImageIngestor)
    }
}

pub struct ImageIngestor;

impl Ingestor for ImageIngestor {
    fn ingest(&mut self, manager: &Manager, result: &mut IngestResult, file_path: &Path) -> Result<()> {
        let Some(service) = manager.ocr_service() else {
            return Err(SluiceError::processing(
                "No OCR service available for image content",
            ));
        };

        let languages = manager
            .get_env(OCR_LANGUAGES_OPTION, Some(DEFAULT_OCR_LANGUAGES))
            .unwrap_or_else(|| DEFAULT_OCR_LANGUAGES.to_string());

        let bytes = std::fs::read(file_path)?;
        let text = service.recognize(&bytes, &languages)?;
        result.emit_text_body(&text);
        result.emit_metadata("ocr_engine", service.name());
        Ok(())
    }
}
