//! `collator lookup`: resolve a generated position through a map file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::splice::{Mapping, parse_mapping};

/// Parse `LINE:COLUMN` (both zero-based).
pub fn parse_position(position: &str) -> Result<(u32, u32)> {
    let Some((line, column)) = position.split_once(':') else {
        bail!("expected LINE:COLUMN, got `{position}`");
    };
    let line = line
        .trim()
        .parse()
        .with_context(|| format!("invalid line in `{position}`"))?;
    let column = column
        .trim()
        .parse()
        .with_context(|| format!("invalid column in `{position}`"))?;
    Ok((line, column))
}

/// Describe where `line:column` of the generated file comes from.
pub fn describe(mapping: &Mapping, line: u32, column: u32) -> Option<String> {
    let hit = mapping.lookup(line, column)?;
    let mut out = format!("{}:{}:{}", hit.source, hit.original.line, hit.original.column);
    if let Some(name) = hit.name {
        out.push_str(&format!(" ({name})"));
    }
    Some(out)
}

pub fn run(map: &Path, position: &str) -> Result<()> {
    let (line, column) = parse_position(position)?;
    let json =
        fs::read_to_string(map).with_context(|| format!("Failed to read {}", map.display()))?;
    let mapping =
        parse_mapping(&json).with_context(|| format!("Failed to parse {}", map.display()))?;

    match describe(&mapping, line, column) {
        Some(found) => println!("{found}"),
        None => bail!("no mapping at {line}:{column} in {}", map.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MAP: &str =
        r#"{"version":3,"sources":["a.ts"],"names":["add"],"mappings":"AAUA;AACAA,IAAI"}"#;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("3:14").unwrap(), (3, 14));
        assert_eq!(parse_position(" 0 : 0 ").unwrap(), (0, 0));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a:1").is_err());
        assert!(parse_position("1:-1").is_err());
    }

    #[test]
    fn test_describe() {
        let mapping = parse_mapping(MAP).unwrap();
        assert_eq!(describe(&mapping, 0, 5).as_deref(), Some("a.ts:10:0"));
        assert_eq!(describe(&mapping, 1, 0).as_deref(), Some("a.ts:11:0 (add)"));
        assert_eq!(describe(&mapping, 1, 6).as_deref(), Some("a.ts:11:4"));
        assert_eq!(describe(&mapping, 2, 0), None);
    }

    #[test]
    fn test_run_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.map");
        fs::write(&path, MAP).unwrap();
        run(&path, "0:0").unwrap();
        assert!(run(&path, "9:0").is_err());
        assert!(run(&dir.path().join("missing.map"), "0:0").is_err());
    }
}
