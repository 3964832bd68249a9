//! Mapping data model: positions, entries, and the merge/lookup operations
//! the splicer and the minifier build on.
//!
//! A [`Mapping`] owns its entries plus the interned list of sources and names
//! they reference. Entries are kept in generated order; every producer in
//! this crate (identity synthesis, map parsing, appending) preserves that.

use rustc_hash::FxHashMap;

// ============================================================================
// Position / MappingEntry
// ============================================================================

/// Zero-indexed `(line, column)` pair.
///
/// Columns are counted in UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// One generated → original association.
///
/// `source` and `name` index into the owning [`Mapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry {
    pub generated: Position,
    pub original: Position,
    pub source: u32,
    pub name: Option<u32>,
}

/// An entry with its indices resolved to strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub generated: Position,
    pub original: Position,
    pub source: &'a str,
    pub name: Option<&'a str>,
}

// ============================================================================
// Mapping
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<MappingEntry>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    source_index: FxHashMap<String, u32>,
    name_index: FxHashMap<String, u32>,
}

#[allow(clippy::cast_possible_truncation)] // Source/name tables never approach u32::MAX
impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Interning
    // ------------------------------------------------------------------------

    /// Intern a source identifier, returning its index.
    pub fn add_source(&mut self, source: &str) -> u32 {
        if let Some(&idx) = self.source_index.get(source) {
            return idx;
        }
        let idx = self.sources.len() as u32;
        self.sources.push(source.to_owned());
        self.sources_content.push(None);
        self.source_index.insert(source.to_owned(), idx);
        idx
    }

    /// Intern a symbol name, returning its index.
    pub fn add_name(&mut self, name: &str) -> u32 {
        if let Some(&idx) = self.name_index.get(name) {
            return idx;
        }
        let idx = self.names.len() as u32;
        self.names.push(name.to_owned());
        self.name_index.insert(name.to_owned(), idx);
        idx
    }

    /// Attach embedded content to an interned source. First content wins.
    pub fn set_source_content(&mut self, source: u32, content: String) {
        if let Some(slot) = self.sources_content.get_mut(source as usize)
            && slot.is_none()
        {
            *slot = Some(content);
        }
    }

    // ------------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------------

    /// Push an entry whose indices already belong to this mapping.
    pub fn push(&mut self, entry: MappingEntry) {
        debug_assert!((entry.source as usize) < self.sources.len());
        self.entries.push(entry);
    }

    /// Push an entry by source/name string, interning as needed.
    pub fn push_mapped(
        &mut self,
        generated: Position,
        original: Position,
        source: &str,
        name: Option<&str>,
    ) {
        let source = self.add_source(source);
        let name = name.map(|n| self.add_name(n));
        self.entries.push(MappingEntry {
            generated,
            original,
            source,
            name,
        });
    }

    /// Sort entries by generated position (stable).
    pub fn sort(&mut self) {
        if !self.entries.is_sorted_by_key(|e| e.generated) {
            self.entries.sort_by_key(|e| e.generated);
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn sources_content(&self) -> &[Option<String>] {
        &self.sources_content
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn source(&self, idx: u32) -> &str {
        &self.sources[idx as usize]
    }

    pub fn name(&self, idx: u32) -> &str {
        &self.names[idx as usize]
    }

    pub fn source_content(&self, source: &str) -> Option<&str> {
        let idx = *self.source_index.get(source)?;
        self.sources_content[idx as usize].as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest generated line referenced by any entry.
    pub fn max_generated_line(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.generated.line).max()
    }

    pub fn resolve(&self, entry: &MappingEntry) -> Resolved<'_> {
        Resolved {
            generated: entry.generated,
            original: entry.original,
            source: self.source(entry.source),
            name: entry.name.map(|n| self.name(n)),
        }
    }

    /// Iterate entries with their source and name resolved.
    pub fn iter(&self) -> impl Iterator<Item = Resolved<'_>> {
        self.entries.iter().map(|e| self.resolve(e))
    }

    // ------------------------------------------------------------------------
    // Merge
    // ------------------------------------------------------------------------

    /// Fold `other` into `self`, shifting its generated lines by `line_offset`.
    ///
    /// `other` must describe text that starts at `line_offset` in the
    /// coordinate space of `self`. Source and name indices are re-interned;
    /// original positions are left untouched. Linear in `other.len()`.
    pub fn append(&mut self, other: &Mapping, line_offset: u32) {
        // Lazily interned so sources that no entry references stay out.
        let mut sources: Vec<Option<u32>> = vec![None; other.sources.len()];
        let mut names: Vec<Option<u32>> = vec![None; other.names.len()];

        self.entries.reserve(other.entries.len());
        for entry in &other.entries {
            let source = match sources[entry.source as usize] {
                Some(idx) => idx,
                None => {
                    let idx = self.add_source(other.source(entry.source));
                    if let Some(content) = &other.sources_content[entry.source as usize] {
                        self.set_source_content(idx, content.clone());
                    }
                    sources[entry.source as usize] = Some(idx);
                    idx
                }
            };
            let name = entry.name.map(|n| {
                *names[n as usize].get_or_insert_with(|| self.add_name(other.name(n)))
            });
            self.entries.push(MappingEntry {
                generated: Position::new(
                    entry.generated.line + line_offset,
                    entry.generated.column,
                ),
                original: entry.original,
                source,
                name,
            });
        }
    }

    /// Drop entries on the given generated lines and pull later lines up.
    ///
    /// `removed` must be sorted ascending. Used after declaration lines were
    /// cut out of the text this mapping describes.
    pub fn remove_generated_lines(&mut self, removed: &[u32]) {
        if removed.is_empty() {
            return;
        }
        self.entries.retain_mut(|entry| {
            let line = entry.generated.line;
            if removed.binary_search(&line).is_ok() {
                return false;
            }
            entry.generated.line -= removed.partition_point(|&r| r < line) as u32;
            true
        });
    }

    /// Drop entries at or beyond `line_count`. Returns how many were dropped.
    pub fn truncate_lines(&mut self, line_count: u32) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.generated.line < line_count);
        before - self.entries.len()
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Find the entry on `line` with the greatest generated column `<= column`.
    pub fn lookup(&self, line: u32, column: u32) -> Option<Resolved<'_>> {
        let start = self.entries.partition_point(|e| e.generated.line < line);
        self.entries[start..]
            .iter()
            .take_while(|e| e.generated.line == line)
            .filter(|e| e.generated.column <= column)
            .max_by_key(|e| e.generated.column)
            .map(|e| self.resolve(e))
    }

    /// Map every entry of `self` through `inner`.
    ///
    /// `self` maps some output to the text `inner` was generated for (e.g.
    /// minified → combined); the result maps that output straight to
    /// `inner`'s originals. Entries `inner` cannot resolve are dropped. A
    /// name from `inner` wins over one from `self`.
    pub fn compose(&self, inner: &Mapping) -> Mapping {
        let mut out = Mapping::new();
        for entry in &self.entries {
            let Some(hit) = inner.lookup(entry.original.line, entry.original.column) else {
                continue;
            };
            let name = hit.name.or_else(|| entry.name.map(|n| self.name(n)));
            out.push_mapped(entry.generated, hit.original, hit.source, name);
        }
        for (idx, source) in out.sources.clone().iter().enumerate() {
            if let Some(content) = inner.source_content(source) {
                out.set_source_content(idx as u32, content.to_owned());
            }
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
