//! Asset URL to filesystem path resolution.

use std::path::{Path, PathBuf};

use super::FetchError;

/// Normalize URL: decode, strip query string and fragment, trim slashes
pub fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    decoded.trim_matches('/').to_string()
}

/// Resolve `url` to a path beneath `root`.
///
/// The file does not have to exist; callers report missing files
/// themselves. Any `..` segment is rejected outright, as is a path that
/// escapes `root` through a symlink.
pub fn resolve_under(root: &Path, url: &str) -> Result<PathBuf, FetchError> {
    let clean = normalize_url(url);
    let outside = || FetchError::OutsideRoot {
        url: url.to_owned(),
        root: root.to_path_buf(),
    };

    if clean.split('/').any(|part| part == "..") {
        return Err(outside());
    }

    let local = root.join(&clean);

    // Symlinks may still point out of the root
    if let (Ok(canonical), Ok(root_canonical)) = (local.canonicalize(), root.canonicalize())
        && !canonical.starts_with(&root_canonical)
    {
        return Err(outside());
    }

    Ok(local)
}
