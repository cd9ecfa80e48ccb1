//! MIME type sniffing and normalization.
//!
//! The orchestrator only trusts a media type once it is "specific": a
//! caller-supplied generic placeholder such as `application/octet-stream`
//! triggers byte-level sniffing, while a specific caller-supplied type is
//! never overwritten.

use std::path::Path;

/// Sentinel type for directories and other non-regular files; routed to the
/// reserved directory handler, never to the open plugin set.
pub const DIRECTORY_MIME_TYPE: &str = "inode/directory";
/// Fallback type when nothing better is known.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";
pub const SVG_MIME_TYPE: &str = "image/svg+xml";
pub const XML_MIME_TYPE: &str = "application/xml";
pub const XML_TEXT_MIME_TYPE: &str = "text/xml";
pub const ZIP_MIME_TYPE: &str = "application/zip";

/// Generic types that carry no routing information.
const NON_SPECIFIC: &[&str] = &[DEFAULT_MIME_TYPE, "application/x-empty", "inode/x-empty"];

/// Normalize a raw media type string into canonical form.
///
/// Lowercases, strips parameters (`; charset=...`) and surrounding
/// whitespace. Anything that does not look like `type/subtype` collapses to
/// the octet-stream default.
pub fn normalize_mimetype(raw: &str) -> String {
    let essence = raw.split(';').next().unwrap_or("").trim().to_lowercase();
    let mut parts = essence.splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(main), Some(sub)) if !main.is_empty() && !sub.is_empty() => {
            format!("{}/{}", main, sub)
        }
        _ => DEFAULT_MIME_TYPE.to_string(),
    }
}

/// Whether a media type is informative enough to route on.
pub fn is_specific(mime_type: Option<&str>) -> bool {
    match mime_type {
        Some(mime) => {
            let mime = mime.trim();
            !mime.is_empty() && mime.contains('/') && !NON_SPECIFIC.contains(&mime)
        }
        None => false,
    }
}

/// Sniff the media type of a file from its leading bytes.
///
/// Falls back to an extension-based guess, and finally to the octet-stream
/// default; the output is already normalized. I/O errors while reading the
/// file bubble up.
pub fn sniff_mime(path: &Path) -> crate::Result<String> {
    if let Some(kind) = infer::get_from_path(path)? {
        return Ok(normalize_mimetype(kind.mime_type()));
    }

    if let Some(guess) = mime_guess::from_path(path).first() {
        return Ok(normalize_mimetype(guess.essence_str()));
    }

    Ok(DEFAULT_MIME_TYPE.to_string())
}
