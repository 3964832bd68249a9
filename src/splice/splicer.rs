//! The splicing accumulator.
//!
//! A [`Splicer`] is created empty per build and grows through
//! [`Splicer::add_script`], one asset at a time, in output order. Each call
//! strips the asset's map declaration, resolves its mapping (supplied or
//! identity), merges that mapping at the current line offset, and appends
//! the stripped text. Readers never mutate.

use super::declaration::strip_declarations;
use super::document::parse_mapping;
use super::error::SpliceError;
use super::identity::identity_map;
use super::mapping::Mapping;

/// Where one added asset landed in the combined output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub url: String,
    /// First generated line of the segment in the combined text.
    pub start_line: u32,
    pub line_count: u32,
    /// Whether the asset came with its own source map.
    pub has_map: bool,
}

/// Final spliced text and mapping, detached from the splicer.
#[derive(Debug, Clone)]
pub struct CombinedOutput {
    pub script: String,
    pub mapping: Mapping,
    pub file: Option<String>,
    pub segments: Vec<Segment>,
}

impl CombinedOutput {
    pub fn sourcemap_string(&self) -> Result<String, SpliceError> {
        Ok(self.mapping.to_json(self.file.as_deref())?)
    }
}

#[derive(Debug, Default)]
pub struct Splicer {
    script: String,
    mapping: Mapping,
    segments: Vec<Segment>,
    line_count: u32,
    file: Option<String>,
}

impl Splicer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the combined output in the serialized map's `file` field.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Add the asset at `url`, with its source map JSON if it has one.
    ///
    /// Without a map the asset is covered by an identity mapping onto
    /// `url`. A map that fails to decode leaves the splicer untouched.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_script(
        &mut self,
        url: &str,
        body: &str,
        source_map: Option<&str>,
    ) -> Result<(), SpliceError> {
        let stripped = strip_declarations(body);
        let lines = stripped.text.split('\n').count() as u32;

        let local = match source_map {
            Some(json) => {
                let mut mapping = parse_mapping(json).map_err(|source| {
                    SpliceError::MalformedMap {
                        url: url.to_owned(),
                        source,
                    }
                })?;
                mapping.remove_generated_lines(&stripped.removed_lines);
                let dropped = mapping.truncate_lines(lines);
                if dropped > 0 {
                    crate::debug!("splice"; "{}: dropped {} map entries past line {}", url, dropped, lines);
                }
                mapping
            }
            None => identity_map(url, &stripped.text),
        };

        self.mapping.append(&local, self.line_count);
        self.script.push_str(&stripped.text);
        self.script.push('\n');
        self.segments.push(Segment {
            url: url.to_owned(),
            start_line: self.line_count,
            line_count: lines,
            has_map: source_map.is_some(),
        });
        self.line_count += lines;
        Ok(())
    }

    /// The combined text. Never contains a map declaration.
    pub fn compile_script_string(&self) -> &str {
        &self.script
    }

    /// The combined mapping as v3 source map JSON.
    pub fn compile_sourcemap_string(&self) -> Result<String, SpliceError> {
        Ok(self.mapping.to_json(self.file.as_deref())?)
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub const fn line_count(&self) -> u32 {
        self.line_count
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Seal the splicer, handing over its text and mapping.
    pub fn finish(self) -> CombinedOutput {
        CombinedOutput {
            script: self.script,
            mapping: self.mapping,
            file: self.file,
            segments: self.segments,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
