//! Identity mappings for assets served without a source map.

use super::mapping::{Mapping, Position};

/// Length of `line` in UTF-16 code units, the unit source map columns use.
#[allow(clippy::cast_possible_truncation)]
pub fn column_len(line: &str) -> u32 {
    line.encode_utf16().count() as u32
}

/// Map every line of `text` onto itself in `source`.
///
/// Each line `n` gets `(n, 0)` and `(n, len)` entries so the whole line
/// resolves; an empty line gets the single `(n, 0)` entry. `text` is
/// expected to be stripped already, so a trailing `\n` is not present and
/// `split('\n')` yields exactly the lines the segment occupies.
#[allow(clippy::cast_possible_truncation)]
pub fn identity_map(source: &str, text: &str) -> Mapping {
    let mut mapping = Mapping::new();
    for (n, line) in text.split('\n').enumerate() {
        let n = n as u32;
        let line = line.strip_suffix('\r').unwrap_or(line);
        let start = Position::new(n, 0);
        mapping.push_mapped(start, start, source, None);

        let len = column_len(line);
        if len > 0 {
            let end = Position::new(n, len);
            mapping.push_mapped(end, end, source, None);
        }
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_line_has_start_and_end() {
        let mapping = identity_map("b.js", "abc\nde");
        let entries: Vec<_> = mapping
            .iter()
            .map(|r| (r.generated, r.original, r.source))
            .collect();
        assert_eq!(
            entries,
            [
                (Position::new(0, 0), Position::new(0, 0), "b.js"),
                (Position::new(0, 3), Position::new(0, 3), "b.js"),
                (Position::new(1, 0), Position::new(1, 0), "b.js"),
                (Position::new(1, 2), Position::new(1, 2), "b.js"),
            ]
        );
        assert_eq!(mapping.sources(), ["b.js"]);
    }

    #[test]
    fn test_blank_lines_still_covered() {
        let mapping = identity_map("c.js", "a\n\nb");
        let lines: Vec<_> = mapping.iter().map(|r| r.generated.line).collect();
        assert_eq!(lines, [0, 0, 1, 2, 2]);
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let mapping = identity_map("empty.js", "");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.sources(), ["empty.js"]);
    }

    #[test]
    fn test_columns_are_utf16() {
        assert_eq!(column_len("héllo"), 5);
        assert_eq!(column_len("a😀"), 3);
        let mapping = identity_map("u.js", "x = '😀'\r");
        assert_eq!(mapping.entries()[1].generated.column, 8);
    }
}
