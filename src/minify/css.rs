//! CSS minification via lightningcss.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use super::{AssetKind, Minified, Minifier, MinifyError};
use crate::splice::Mapping;

/// Minified printing through lightningcss. Produces no output map.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMinifier;

impl Minifier for CssMinifier {
    fn minify(&self, code: &str, _input_map: &Mapping, _file: &str) -> Result<Minified, MinifyError> {
        let stylesheet =
            StyleSheet::parse(code, ParserOptions::default()).map_err(|err| MinifyError::Parse {
                kind: AssetKind::Css,
                message: err.to_string(),
            })?;
        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|err| MinifyError::Print {
                kind: AssetKind::Css,
                message: err.to_string(),
            })?;
        Ok(Minified {
            code: result.code,
            map: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_css() {
        let code = "body {\n  color: red;\n  margin: 0px;\n}\n";
        let out = CssMinifier.minify(code, &Mapping::new(), "out.min.css").unwrap();
        assert!(out.code.len() < code.len());
        assert!(out.code.contains("color:red"));
        assert!(out.map.is_none());
    }
}
