//! Crawler reading assets straight off a directory.

use std::fs;
use std::path::PathBuf;

use super::{Crawler, FetchError, Response, path::resolve_under};

/// Resolves every URL beneath a fixed root. Responses carry no headers.
#[derive(Debug, Clone)]
pub struct FilesystemCrawler {
    root: PathBuf,
}

impl FilesystemCrawler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Crawler for FilesystemCrawler {
    fn get(&self, url: &str) -> Result<Response, FetchError> {
        let path = resolve_under(&self.root, url)?;
        if !path.is_file() {
            return Err(FetchError::NotFound(path));
        }
        let bytes = fs::read(&path).map_err(|err| FetchError::Io(path.clone(), err))?;
        let body = String::from_utf8(bytes).map_err(|_| FetchError::Encoding(url.to_owned()))?;
        Ok(Response::new(body))
    }
}
