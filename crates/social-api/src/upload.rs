//! Helpers shared by the photo and admin file controllers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Accepts missing or extra padding and stray trailing bits.
const LENIENT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn decode_payload(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    LENIENT_B64.decode(data.trim())
}

/// `dir` + `/` + `name`, nothing else. `..` segments, nested paths and
/// leading slashes in `name` are all kept, so the result can point anywhere.
pub fn join_unchecked(dir: &Path, name: &str) -> PathBuf {
    let mut path = OsString::from(dir.as_os_str());
    path.push("/");
    path.push(name);
    PathBuf::from(path)
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain; charset=utf-8",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
