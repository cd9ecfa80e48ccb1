//! Optional text-recognition capability.
//!
//! OCR is an auxiliary service: the orchestrator resolves it lazily, and its
//! absence is an explicit `None` rather than an error. Plugins that depend
//! on it decide for themselves how to degrade.

use crate::{Result, SluiceError};
use std::io::Write;
use std::process::Command;

/// Default language set passed to the recognizer.
pub const DEFAULT_OCR_LANGUAGES: &str = "eng";

/// Text recognition capability boundary.
pub trait OcrService: Send + Sync {
    fn name(&self) -> &str;

    /// Recognize text in an encoded image.
    ///
    /// `languages` uses the engine's own language-list syntax, e.g.
    /// `"eng+deu"` for Tesseract.
    fn recognize(&self, image: &[u8], languages: &str) -> Result<String>;
}

/// OCR service backed by the `tesseract` command-line binary.
#[derive(Debug)]
pub struct TesseractOcr {
    binary: String,
}

impl TesseractOcr {
    /// Probe for a working `tesseract` binary.
    ///
    /// Fails when the binary is missing or cannot report its version; the
    /// caller treats that as "capability unavailable".
    pub fn new() -> Result<Self> {
        Self::with_binary("tesseract")
    }

    pub fn with_binary(binary: &str) -> Result<Self> {
        let probe = Command::new(binary)
            .arg("--version")
            .output()
            .map_err(|e| SluiceError::Ocr {
                message: format!("Cannot execute '{}': {}", binary, e),
                source: Some(Box::new(e)),
            })?;
        if !probe.status.success() {
            return Err(SluiceError::ocr(format!(
                "'{}' --version exited with {}",
                binary, probe.status
            )));
        }
        Ok(Self {
            binary: binary.to_string(),
        })
    }
}

impl OcrService for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &[u8], languages: &str) -> Result<String> {
        // Tesseract wants a file path; hand the bytes over through a
        // temporary file that is removed on drop.
        let mut input = tempfile::NamedTempFile::new().map_err(|e| SluiceError::Ocr {
            message: format!("Cannot stage OCR input: {}", e),
            source: Some(Box::new(e)),
        })?;
        input.write_all(image).map_err(|e| SluiceError::Ocr {
            message: format!("Cannot stage OCR input: {}", e),
            source: Some(Box::new(e)),
        })?;

        let output = Command::new(&self.binary)
            .arg(input.path())
            .arg("stdout")
            .args(["-l", languages])
            .output()
            .map_err(|e| SluiceError::Ocr {
                message: format!("Cannot execute '{}': {}", self.binary, e),
                source: Some(Box::new(e)),
            })?;

        if !output.status.success() {
            return Err(SluiceError::ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
