//! MIME type detection for inlined images and uploaded files

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME from a file extension
pub fn guess_mime_from_path(path: &str) -> Option<String> {
    mime_guess::from_path(path).first_raw().map(|s| s.to_string())
}

/// Magic bytes first, then the extension, otherwise octet-stream.
pub fn detect_media_type(path: &str, bytes: &[u8]) -> String {
    guess_mime_from_bytes(bytes)
        .or_else(|| guess_mime_from_path(path))
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
