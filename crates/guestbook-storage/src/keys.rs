//! Storage key derivation from public media URLs.

/// Recover the storage key of a blob from its public URL.
///
/// The key is the final path segment, with any query string or fragment
/// removed and percent-encoding decoded. Returns `None` when the URL has no
/// usable final segment (empty, trailing slash, or a traversal segment).
pub fn storage_key_from_url(media_url: &str) -> Option<String> {
    let without_fragment = media_url.split('#').next().unwrap_or_default();
    let path = without_fragment.split('?').next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default().trim();

    if segment.is_empty() {
        return None;
    }

    let decoded = match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    };

    if decoded.is_empty() || decoded == "." || decoded == ".." || decoded.contains('/') {
        return None;
    }

    Some(decoded)
}
