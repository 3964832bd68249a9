//! Splicing error types.

use thiserror::Error;

use super::document::DocumentError;

#[derive(Debug, Error)]
pub enum SpliceError {
    /// The map supplied with an asset could not be decoded.
    #[error("malformed source map for `{url}`")]
    MalformedMap {
        url: String,
        #[source]
        source: DocumentError,
    },

    #[error("failed to serialize the combined source map")]
    Serialize(#[from] sourcemap::Error),
}
