//! `[crawl]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [crawl]
//! root = "public"     # Directory asset URLs resolve against
//! app = false         # Fetch through the in-process static app
//! ```
//!
//! With `app = true` responses carry headers, so assets without an inline
//! declaration still find a sibling `<asset>.map` through `SourceMap`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Directory asset URLs resolve against. Tilde-expanded, relative to
    /// the config file.
    pub root: PathBuf,

    /// Serve assets through the in-process static app instead of reading
    /// them straight off disk.
    pub app: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            app: false,
        }
    }
}
