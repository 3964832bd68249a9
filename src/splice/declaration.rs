//! Locating and stripping the `sourceMappingURL=` declaration.
//!
//! The declaration is a single comment line such as
//! `//# sourceMappingURL=app.js.map` or `/*# sourceMappingURL=app.css.map */`.
//! Comment syntax is not assumed, since CSS carries source maps too: any line
//! with at least one character before the marker qualifies.

use regex::Regex;
use std::sync::LazyLock;

use super::Headers;

/// Full-line declaration pattern. Capture 1 is everything after the marker.
static DECLARATION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+sourceMappingURL=(.+)$").unwrap());

/// A whitespace run followed by one last token, e.g. a CSS ` */` closer.
static TRAILING_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\S+$").unwrap());

pub const SOURCE_MAP_HEADER: &str = "SourceMap";
pub const X_SOURCE_MAP_HEADER: &str = "X-SourceMap";

/// Split into lines on `\n`, dropping the `\r` of CRLF endings.
fn lines(body: &str) -> impl Iterator<Item = &str> {
    body.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

fn is_declaration(line: &str) -> bool {
    DECLARATION_LINE.is_match(line)
}

/// Extract the source map URL from a body or its response headers.
///
/// Precedence: inline declaration, then `SourceMap`, then `X-SourceMap`.
pub fn source_map_url_from(body: &str, headers: &Headers) -> Option<String> {
    let inline = lines(body).find_map(|line| DECLARATION_LINE.captures(line));
    if let Some(captures) = inline {
        let url = TRAILING_TOKEN.replace(&captures[1], "");
        return Some(url.trim_end().to_owned());
    }
    headers
        .get(SOURCE_MAP_HEADER)
        .or_else(|| headers.get(X_SOURCE_MAP_HEADER))
        .cloned()
}

/// Body with declaration lines cut out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub text: String,
    /// Zero-based indices (in the original body) of the removed lines, ascending.
    pub removed_lines: Vec<u32>,
}

/// Remove every declaration line, then trim trailing whitespace.
///
/// Other lines, including their original line endings, are kept as they are.
#[allow(clippy::cast_possible_truncation)]
pub fn strip_declarations(body: &str) -> Stripped {
    let mut text = String::with_capacity(body.len());
    let mut removed_lines = Vec::new();

    for (idx, raw) in body.split_inclusive('\n').enumerate() {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if is_declaration(line) {
            removed_lines.push(idx as u32);
        } else {
            text.push_str(raw);
        }
    }

    // Trailing blank lines would shift every later segment's offset
    text.truncate(text.trim_end().len());
    Stripped {
        text,
        removed_lines,
    }
}

/// Strip the declaration from `body`. See [`strip_declarations`].
pub fn remove_sourcemap_declaration(body: &str) -> String {
    strip_declarations(body).text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_headers() -> Headers {
        Headers::default()
    }

    #[test]
    fn test_url_from_js_declaration() {
        let body = "var a = 1;\n//# sourceMappingURL=/js/a.js.map\n";
        assert_eq!(
            source_map_url_from(body, &no_headers()),
            Some("/js/a.js.map".into())
        );
    }

    #[test]
    fn test_url_from_css_declaration_drops_closer() {
        let body = "a{color:red}\n/*# sourceMappingURL=foo.css.map */";
        assert_eq!(
            source_map_url_from(body, &no_headers()),
            Some("foo.css.map".into())
        );
    }

    #[test]
    fn test_url_with_crlf() {
        let body = "x();\r\n//# sourceMappingURL=x.js.map\r\n";
        assert_eq!(
            source_map_url_from(body, &no_headers()),
            Some("x.js.map".into())
        );
    }

    #[test]
    fn test_marker_at_line_start_is_not_a_declaration() {
        let body = "sourceMappingURL=nope.map";
        assert_eq!(source_map_url_from(body, &no_headers()), None);
        assert_eq!(remove_sourcemap_declaration(body), body);
    }

    #[test]
    fn test_header_precedence() {
        let mut headers = no_headers();
        headers.insert(X_SOURCE_MAP_HEADER.into(), "x.map".into());
        assert_eq!(source_map_url_from("a();", &headers), Some("x.map".into()));

        headers.insert(SOURCE_MAP_HEADER.into(), "s.map".into());
        assert_eq!(source_map_url_from("a();", &headers), Some("s.map".into()));

        let body = "a();\n//# sourceMappingURL=inline.map";
        assert_eq!(source_map_url_from(body, &headers), Some("inline.map".into()));
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let mut headers = no_headers();
        headers.insert("sourcemap".into(), "lower.map".into());
        assert_eq!(source_map_url_from("a();", &headers), None);
    }

    #[test]
    fn test_no_reference() {
        assert_eq!(source_map_url_from("a();\nb();", &no_headers()), None);
    }

    #[test]
    fn test_url_with_inner_whitespace_loses_last_token() {
        let body = "a();\n//# sourceMappingURL=my map.js.map";
        assert_eq!(source_map_url_from(body, &no_headers()), Some("my".into()));

        let body = "a();\n//# sourceMappingURL=a.js.map trailing";
        assert_eq!(
            source_map_url_from(body, &no_headers()),
            Some("a.js.map".into())
        );
    }

    #[test]
    fn test_strip_trailing_css_declaration() {
        let body = "line one\nline two\n//# sourceMappingURL=foo.js.map */\n\n\n";
        let stripped = strip_declarations(body);
        assert_eq!(stripped.text, "line one\nline two");
        assert_eq!(stripped.removed_lines, [2]);
        assert_eq!(
            source_map_url_from(body, &no_headers()),
            Some("foo.js.map".into())
        );
    }

    #[test]
    fn test_strip_without_declaration_only_trims() {
        assert_eq!(remove_sourcemap_declaration("a();\nb();  \n\n"), "a();\nb();");
        assert_eq!(remove_sourcemap_declaration(""), "");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let body = "a();\n//# sourceMappingURL=a.map\nb();\n";
        let once = remove_sourcemap_declaration(body);
        assert_eq!(remove_sourcemap_declaration(&once), once);
    }

    #[test]
    fn test_strip_removes_exactly_the_declaration_lines() {
        let body = "a();\n//# sourceMappingURL=a.map\nb();\n//@ sourceMappingURL=old.map\nc();";
        let stripped = strip_declarations(body);
        assert_eq!(stripped.text, "a();\nb();\nc();");
        assert_eq!(stripped.removed_lines, [1, 3]);
        assert_eq!(
            body.split('\n').count() - stripped.text.split('\n').count(),
            stripped.removed_lines.len()
        );
    }

    #[test]
    fn test_strip_keeps_crlf_of_other_lines() {
        let body = "a();\r\nb();\r\n//# sourceMappingURL=a.map\r\n";
        assert_eq!(remove_sourcemap_declaration(body), "a();\r\nb();");
    }
}
