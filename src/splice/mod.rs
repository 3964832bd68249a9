//! Source-map-aware splicing engine.
//!
//! | Module        | Purpose                                            |
//! |---------------|----------------------------------------------------|
//! | `declaration` | Find and strip `sourceMappingURL=` lines           |
//! | `identity`    | Identity mappings for assets without a map         |
//! | `mapping`     | Positions, entries, merge / lookup / compose       |
//! | `document`    | Source Map v3 JSON via the `sourcemap` crate       |
//! | `splicer`     | The accumulator tying the above together           |
//!
//! Everything here is pure or owns its state; fetching, minifying and
//! writing live elsewhere.

pub mod declaration;
pub mod document;
mod error;
pub mod identity;
pub mod mapping;
mod splicer;

use rustc_hash::FxHashMap;

/// Response headers as handed over by the fetch layer. Names are case-sensitive.
pub type Headers = FxHashMap<String, String>;

pub use declaration::{remove_sourcemap_declaration, source_map_url_from, strip_declarations};
pub use document::{DocumentError, parse_mapping};
pub use error::SpliceError;
pub use identity::identity_map;
pub use mapping::{Mapping, MappingEntry, Position, Resolved};
pub use splicer::{CombinedOutput, Segment, Splicer};
