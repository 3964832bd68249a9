//! Source Map v3 JSON, read and written through the `sourcemap` crate.
//!
//! [`parse_mapping`] turns a supplied payload into a [`Mapping`] in the
//! payload's own coordinates; [`Mapping::to_json`] writes one back out.

use rustc_hash::FxHashMap;
use sourcemap::{DecodedMap, SourceMap, SourceMapBuilder};
use thiserror::Error;

use super::mapping::{Mapping, MappingEntry, Position};

/// Why a source map payload could not be turned into a [`Mapping`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot decode source map")]
    Decode(#[from] sourcemap::Error),

    #[error("index maps with `sections` are not supported")]
    IndexMap,
}

/// Parse a v3 source map JSON payload into a [`Mapping`].
pub fn parse_mapping(json: &str) -> Result<Mapping, DocumentError> {
    match sourcemap::decode_slice(json.as_bytes())? {
        DecodedMap::Regular(map) => Ok(Mapping::from_sourcemap(&map)),
        _ => Err(DocumentError::IndexMap),
    }
}

impl Mapping {
    /// Collect the tokens of a decoded map that carry an original position.
    ///
    /// Sources and names are interned on first use, so ones no token
    /// references are left out.
    pub fn from_sourcemap(map: &SourceMap) -> Self {
        let mut mapping = Mapping::new();
        let mut sources: FxHashMap<u32, u32> = FxHashMap::default();

        for token in map.tokens() {
            let Some(source) = token.get_source() else {
                continue;
            };
            let src_id = token.get_src_id();
            let interned = *sources.entry(src_id).or_insert_with(|| {
                let idx = mapping.add_source(source);
                if let Some(content) = map.get_source_contents(src_id) {
                    mapping.set_source_content(idx, content.to_owned());
                }
                idx
            });
            let name = token.get_name().map(|name| mapping.add_name(name));

            mapping.push(MappingEntry {
                generated: Position::new(token.get_dst_line(), token.get_dst_col()),
                original: Position::new(token.get_src_line(), token.get_src_col()),
                source: interned,
                name,
            });
        }

        mapping.sort();
        mapping
    }

    /// Build the crate-level source map. Entries must be in generated order.
    pub fn to_sourcemap(&self, file: Option<&str>) -> SourceMap {
        let mut builder = SourceMapBuilder::new(file);
        for (source, content) in self.sources().iter().zip(self.sources_content()) {
            let idx = builder.add_source(source);
            if let Some(content) = content {
                builder.set_source_contents(idx, Some(content));
            }
        }
        for name in self.names() {
            builder.add_name(name);
        }
        for entry in self.entries() {
            builder.add_raw(
                entry.generated.line,
                entry.generated.column,
                entry.original.line,
                entry.original.column,
                Some(entry.source),
                entry.name,
                false,
            );
        }
        builder.into_sourcemap()
    }

    /// Serialize as v3 JSON.
    pub fn to_json(&self, file: Option<&str>) -> Result<String, sourcemap::Error> {
        let mut out = Vec::new();
        self.to_sourcemap(file).to_writer(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
