//! Where a declared source map lives.
//!
//! A declaration (or `SourceMap` header) may carry the map inline as a
//! `data:` URL, point at an absolute URL, or name a path relative to the
//! asset that declared it.

use base64::{Engine, engine::general_purpose};
use percent_encoding::percent_decode_str;
use url::Url;

use crate::crawler::FetchError;

/// Base for resolving asset-relative references. Only the path survives.
const RESOLVE_BASE: &str = "http://collator.invalid/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapLocation {
    /// The map JSON itself, decoded from a `data:` URL.
    Inline(String),
    /// A URL to fetch through the crawler.
    Url(String),
}

/// Locate the map `reference` declared by the asset at `asset_url`.
///
/// Absolute `http(s)` references are reduced to their path and query, since
/// crawlers route by path the way an in-process app does.
pub fn locate_map(asset_url: &str, reference: &str) -> Result<MapLocation, FetchError> {
    let reference = reference.trim();
    if let Some(data) = reference.strip_prefix("data:") {
        return decode_data_url(data, reference).map(MapLocation::Inline);
    }

    let invalid = || FetchError::InvalidUrl(reference.to_owned());
    let base = Url::parse(RESOLVE_BASE).map_err(|_| invalid())?;
    let asset = base.join(asset_url).map_err(|_| invalid())?;
    let resolved = asset.join(reference).map_err(|_| invalid())?;

    Ok(MapLocation::Url(match resolved.query() {
        Some(query) => format!("{}?{}", resolved.path(), query),
        None => resolved.path().to_owned(),
    }))
}

/// Decode the part of a `data:` URL after the scheme.
fn decode_data_url(data: &str, reference: &str) -> Result<String, FetchError> {
    let invalid = || FetchError::InvalidUrl(reference.to_owned());
    let (meta, payload) = data.split_once(',').ok_or_else(invalid)?;

    let bytes = if meta.ends_with(";base64") {
        general_purpose::STANDARD
            .decode(payload)
            .map_err(|_| invalid())?
    } else {
        percent_decode_str(payload).collect()
    };
    String::from_utf8(bytes).map_err(|_| FetchError::Encoding(reference.to_owned()))
}
