//! Fetch layer: retrieves asset bodies, their headers, and their maps.
//!
//! Two crawlers are provided:
//! - [`FilesystemCrawler`] reads beneath a fixed root directory
//! - [`AppCrawler`] asks an in-process [`App`] (HTTP-like harness), so the
//!   same handler that serves compiled assets can feed the build
//!
//! Both report problems as [`FetchError`]. There is no retry: a failed fetch
//! aborts the build.

mod app;
mod filesystem;
pub mod path;

use std::path::PathBuf;
use thiserror::Error;

pub use crate::splice::Headers;
pub use app::{App, AppCrawler, AppResponse, StaticApp};
pub use filesystem::FilesystemCrawler;

/// What a crawler hands back for one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub body: String,
    pub headers: Headers,
}

impl Response {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            headers: Headers::default(),
        }
    }
}

/// Retrieves assets by URL.
pub trait Crawler {
    fn get(&self, url: &str) -> Result<Response, FetchError>;
}

impl<C: Crawler + ?Sized> Crawler for &C {
    fn get(&self, url: &str) -> Result<Response, FetchError> {
        (**self).get(url)
    }
}

impl<C: Crawler + ?Sized> Crawler for Box<C> {
    fn get(&self, url: &str) -> Result<Response, FetchError> {
        (**self).get(url)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no such file: {}", .0.display())]
    NotFound(PathBuf),

    #[error("`{url}` resolves outside of {}", root.display())]
    OutsideRoot { url: String, root: PathBuf },

    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` is not valid UTF-8")]
    Encoding(String),

    #[error("something went wrong fetching `{url}`: status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid source map URL `{0}`")]
    InvalidUrl(String),
}
