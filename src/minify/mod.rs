//! Minification of a spliced bundle.
//!
//! JavaScript goes through oxc (mangle, compress, minified codegen with a
//! source map), CSS through lightningcss. The JS output map is composed with
//! the bundle's own map so the minified artifact points at the original
//! sources rather than at the combined file.

mod css;
mod js;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::splice::Mapping;

pub use css::CssMinifier;
pub use js::JsMinifier;

/// Output of one minify pass.
#[derive(Debug, Clone, Default)]
pub struct Minified {
    pub code: String,
    /// Map from the minified code to the original sources, when the
    /// minifier can produce one.
    pub map: Option<Mapping>,
}

pub trait Minifier {
    /// Minify `code`, whose own map is `input_map`. `file` names the
    /// minified output inside the produced map.
    fn minify(&self, code: &str, input_map: &Mapping, file: &str) -> Result<Minified, MinifyError>;
}

#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("failed to parse {kind} for minification: {message}")]
    Parse { kind: AssetKind, message: String },

    #[error("failed to print minified {kind}: {message}")]
    Print { kind: AssetKind, message: String },
}

// ============================================================================
// AssetKind
// ============================================================================

/// Which language a bundle is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    #[default]
    Js,
    Css,
}

impl AssetKind {
    /// Infer from a URL or path extension (`?query` and `#fragment` ignored).
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        match Path::new(path).extension()?.to_str()? {
            "js" | "mjs" | "cjs" => Some(Self::Js),
            "css" => Some(Self::Css),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Css => "css",
        }
    }

    /// The declaration line that points the minified artifact at its map.
    pub fn sourcemap_comment(self, map_url: &str) -> String {
        match self {
            Self::Js => format!("//# sourceMappingURL={map_url}"),
            Self::Css => format!("/*# sourceMappingURL={map_url} */"),
        }
    }

    pub fn minifier(self) -> Box<dyn Minifier> {
        match self {
            Self::Js => Box::new(JsMinifier),
            Self::Css => Box::new(CssMinifier),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "js" => Ok(Self::Js),
            "css" => Ok(Self::Css),
            other => Err(format!("unknown asset kind `{other}` (expected `js` or `css`)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_url() {
        assert_eq!(AssetKind::from_url("/js/app.js"), Some(AssetKind::Js));
        assert_eq!(AssetKind::from_url("/js/app.mjs?v=2"), Some(AssetKind::Js));
        assert_eq!(AssetKind::from_url("/css/site.css#x"), Some(AssetKind::Css));
        assert_eq!(AssetKind::from_url("/img/logo.png"), None);
        assert_eq!(AssetKind::from_url("/js/app"), None);
    }

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!("css".parse::<AssetKind>(), Ok(AssetKind::Css));
        assert!("ts".parse::<AssetKind>().is_err());
        assert_eq!(AssetKind::Js.to_string(), "js");
    }

    #[test]
    fn test_sourcemap_comment() {
        assert_eq!(
            AssetKind::Js.sourcemap_comment("b.min.map"),
            "//# sourceMappingURL=b.min.map"
        );
        assert_eq!(
            AssetKind::Css.sourcemap_comment("b.min.map"),
            "/*# sourceMappingURL=b.min.map */"
        );
    }
}
