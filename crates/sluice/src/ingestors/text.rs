//! Plain text ingestor.

use crate::manager::Manager;
use crate::mime::PLAIN_TEXT_MIME_TYPE;
use crate::plugin::{match_mime, Ingestor, IngestorFactory};
use crate::result::IngestResult;
use crate::{Result, SluiceError};
use std::path::Path;

pub struct PlainTextFactory;

impl IngestorFactory for PlainTextFactory {
    fn name(&self) -> &str {
        "plain-text"
    }

    fn match_score(&self, _file_path: &Path, result: &IngestResult) -> i32 {
        let exact = match_mime(result, &[PLAIN_TEXT_MIME_TYPE], 2);
        if exact > 0 {
            return exact;
        }
        // Low-confidence fallback for the rest of the text family; more
        // specific handlers outbid this.
        match_mime(result, &["text/*"], 1)
    }

    fn create(&self, _work_path: Option<&Path>) -> Box<dyn Ingestor> {
        Box::new(PlainTextIngestor)
    }
}

pub struct PlainTextIngestor;

impl Ingestor for PlainTextIngestor {
    fn ingest(&mut self, _manager: &Manager, result: &mut IngestResult, file_path: &Path) -> Result<()> {
        let bytes = std::fs::read(file_path)?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| SluiceError::processing_with_source(format!("Cannot decode text: {}", e), e))?;
        result.emit_text_body(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::IngestResult;

    fn result_with_mime(mime: &str) -> IngestResult {
        let mut result = IngestResult::new();
        result.mime_type = Some(mime.to_string());
        result
    }

    #[test]
    fn test_scores() {
        let factory = PlainTextFactory;
        let path = Path::new("any");
        assert_eq!(factory.match_score(path, &result_with_mime("text/plain")), 2);
        assert_eq!(factory.match_score(path, &result_with_mime("text/csv")), 1);
        assert_eq!(factory.match_score(path, &result_with_mime("application/pdf")), 0);
    }

    #[test]
    fn test_extracts_utf8_body() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, "héllo wörld".as_bytes()).unwrap();

        let mut result = IngestResult::new();
        let manager = Manager::default();
        PlainTextIngestor
            .ingest(&manager, &mut result, file.path())
            .unwrap();
        assert_eq!(result.body_text.as_deref(), Some("héllo wörld"));
    }

    #[test]
    fn test_invalid_utf8_is_processing_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &[0xC3, 0x28, 0xFF]).unwrap();

        let mut result = IngestResult::new();
        let manager = Manager::default();
        let err = PlainTextIngestor
            .ingest(&manager, &mut result, file.path())
            .unwrap_err();
        assert!(err.is_processing());
        assert!(err.to_string().contains("Cannot decode text"));
    }
}
