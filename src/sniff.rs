// src/sniff.rs

use std::path::Path;

/// MIME types the extraction service accepts.
pub const ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/tiff",
];

/// Determine the MIME type of an upload. Magic bytes are authoritative;
/// the file extension is only consulted when the content is too short or
/// unrecognized at the byte level.
pub fn detect_mime(bytes: &[u8], path: &Path) -> Option<&'static str> {
    sniff_magic(bytes).or_else(|| extension_mime(path))
}

fn sniff_magic(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF") {
        return Some("application/pdf");
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]) {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        return Some("image/jpeg");
    }
    // Little- and big-endian TIFF headers.
    if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        return Some("image/tiff");
    }
    None
}

fn extension_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes() {
        let path = Path::new("upload.bin");
        assert_eq!(
            detect_mime(b"%PDF-1.7 rest of file", path),
            Some("application/pdf")
        );
        assert_eq!(
            detect_mime(&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00], path),
            Some("image/png")
        );
        assert_eq!(detect_mime(&[0xff, 0xd8, 0xff, 0xe0], path), Some("image/jpeg"));
        assert_eq!(detect_mime(b"II*\0rest", path), Some("image/tiff"));
        assert_eq!(detect_mime(b"MM\0*rest", path), Some("image/tiff"));
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(
            detect_mime(b"", Path::new("scan.TIFF")),
            Some("image/tiff")
        );
        assert_eq!(
            detect_mime(b"short", Path::new("photo.jpeg")),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_magic_wins_over_extension() {
        // Content says PDF even though the name says PNG.
        assert_eq!(
            detect_mime(b"%PDF-1.4", Path::new("mislabeled.png")),
            Some("application/pdf")
        );
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(detect_mime(b"hello world", Path::new("notes.txt")), None);
        assert_eq!(detect_mime(b"GIF89a", Path::new("anim.gif")), None);
    }
}
