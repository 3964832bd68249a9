//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! assets = ["/js/vendor.js", "/js/app.js"]   # Spliced in this order
//! output = "dist"                            # Artifact directory
//! minify = true                              # Also write build.*.min.*
//! kind = "js"                                # js or css; inferred when omitted
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::minify::AssetKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Asset URLs, in output order.
    pub assets: Vec<String>,

    /// Directory build artifacts are written to.
    pub output: PathBuf,

    /// Write a minified bundle next to the combined one.
    pub minify: bool,

    /// Asset language. `None` infers it from the first asset's extension.
    pub kind: Option<AssetKind>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            output: PathBuf::from("."),
            minify: true,
            kind: None,
        }
    }
}

impl BuildConfig {
    /// Collect problems into `errors`.
    pub fn validate(&self, errors: &mut Vec<String>) {
        if self.assets.is_empty() {
            errors.push("[build] assets: no assets to collate".into());
        }
        for (idx, url) in self.assets.iter().enumerate() {
            if url.trim().is_empty() {
                errors.push(format!("[build] assets[{idx}]: empty URL"));
            }
        }
        if self.output.is_file() {
            errors.push(format!(
                "[build] output: `{}` is a file, expected a directory",
                self.output.display()
            ));
        }
    }
}
