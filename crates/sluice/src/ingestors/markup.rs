//! XML-family markup ingestor.
//!
//! Handles generic XML plus SVG, whose text nodes often carry real document
//! content (labels, annotations, embedded captions). Markup structure is
//! discarded; text and CDATA nodes are emitted in document order.

use crate::manager::Manager;
use crate::mime::{SVG_MIME_TYPE, XML_MIME_TYPE, XML_TEXT_MIME_TYPE};
use crate::plugin::{match_mime, Ingestor, IngestorFactory};
use crate::result::IngestResult;
use crate::{Result, SluiceError};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

const MIME_TYPES: &[&str] = &[SVG_MIME_TYPE, XML_MIME_TYPE, XML_TEXT_MIME_TYPE];

pub struct MarkupFactory;

impl IngestorFactory for MarkupFactory {
    fn name(&self) -> &str {
        "markup"
    }

    fn match_score(&self, _file_path: &Path, result: &IngestResult) -> i32 {
        match_mime(result, MIME_TYPES, 3)
    }

    fn create(&self, _work_path: Option<&Path>) -> Box<dyn Ingestor> {
        Box::new(MarkupIngestor)
    }
}

pub struct MarkupIngestor;

/// Emit a completed text run, dropping whitespace-only runs such as the
/// indentation between elements.
fn flush_run(result: &mut IngestResult, run: &mut String) {
    if !run.is_empty() {
        result.emit_text_body(run);
        run.clear();
    }
}

impl Ingestor for MarkupIngestor {
    fn ingest(&mut self, _manager: &Manager, result: &mut IngestResult, file_path: &Path) -> Result<()> {
        let bytes = std::fs::read(file_path)?;

        let mut reader = Reader::from_reader(bytes.as_slice());
        reader.config_mut().check_end_names = false;

        let mut element_count = 0usize;
        let mut buf = Vec::new();
        // A text run can span several events: the parser splits entity
        // references (`&amp;`) out of the surrounding text. Fragments of one
        // run are accumulated here and flushed on the next structural event,
        // so the run stays a single line of body text.
        let mut run = String::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(_)) | Ok(Event::Empty(_)) => {
                    element_count += 1;
                    flush_run(result, &mut run);
                }
                Ok(Event::End(_)) => flush_run(result, &mut run),
                Ok(Event::Text(e)) => {
                    let text = e
                        .decode()
                        .map_err(|e| SluiceError::processing_with_source("Cannot decode markup text", e))?;
                    run.push_str(&text);
                }
                Ok(Event::GeneralRef(e)) => {
                    if let Some(ch) = e
                        .resolve_char_ref()
                        .map_err(|e| SluiceError::processing_with_source("Invalid character reference", e))?
                    {
                        run.push(ch);
                    } else {
                        let name = e
                            .decode()
                            .map_err(|e| SluiceError::processing_with_source("Cannot decode entity name", e))?;
                        if let Some(text) = resolve_predefined_entity(&name) {
                            run.push_str(text);
                        }
                        // Document-defined entities have no replacement text
                        // available here and are skipped.
                    }
                }
                Ok(Event::CData(e)) => run.push_str(&String::from_utf8_lossy(&e)),
                Ok(Event::Eof) => {
                    flush_run(result, &mut run);
                    break;
                }
                Err(e) => {
                    return Err(SluiceError::processing_with_source(
                        format!("Cannot parse markup at position {}: {}", reader.buffer_position(), e),
                        e,
                    ));
                }
                Ok(_) => {}
            }
            buf.clear();
        }

        result.emit_metadata("element_count", element_count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingest_bytes(content: &[u8]) -> Result<IngestResult> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, content).unwrap();
        let mut result = IngestResult::new();
        let manager = Manager::default();
        MarkupIngestor.ingest(&manager, &mut result, file.path())?;
        Ok(result)
    }

    #[test]
    fn test_svg_text_nodes_extracted() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><text x="0" y="15">TEST</text></svg>"#;
        let result = ingest_bytes(svg).unwrap();
        assert!(result.body_text.unwrap().contains("TEST"));
    }

    #[test]
    fn test_xml_text_and_cdata() {
        let xml = b"<doc><p>hello</p><p><![CDATA[raw & unescaped]]></p></doc>";
        let result = ingest_bytes(xml).unwrap();
        let body = result.body_text.unwrap();
        assert!(body.contains("hello"));
        assert!(body.contains("raw & unescaped"));
        assert_eq!(result.metadata["element_count"], 3);
    }

    #[test]
    fn test_entity_reference_kept_inside_text_run() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><text>A &amp; B</text></svg>"#;
        let result = ingest_bytes(svg).unwrap();
        assert_eq!(result.body_text.as_deref(), Some("A & B"));
    }

    #[test]
    fn test_predefined_and_character_references_resolved() {
        let xml = b"<doc>caf&#233; &lt;tag&gt; &#x41;</doc>";
        let result = ingest_bytes(xml).unwrap();
        assert_eq!(result.body_text.as_deref(), Some("caf\u{e9} <tag> A"));
    }

    #[test]
    fn test_truncated_markup_is_tolerated() {
        // End-name checking is off, so truncated documents still yield
        // whatever text was seen before the cut.
        let result = ingest_bytes(b"<doc><open>text").unwrap();
        assert_eq!(result.body_text.as_deref(), Some("text"));
    }

    #[test]
    fn test_scores_markup_mimes() {
        let factory = MarkupFactory;
        let path = Path::new("any");
        for mime in ["image/svg+xml", "application/xml", "text/xml"] {
            let mut result = IngestResult::new();
            result.mime_type = Some(mime.to_string());
            assert_eq!(factory.match_score(path, &result), 3, "{}", mime);
        }
        let mut other = IngestResult::new();
        other.mime_type = Some("text/plain".to_string());
        assert_eq!(factory.match_score(path, &other), 0);
    }
}
