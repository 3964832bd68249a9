//! In-process HTTP-like harness.
//!
//! An [`App`] answers a request path with a status, headers and a body, the
//! way a mounted web application would, without a socket in between.
//! [`AppCrawler`] turns any app into a [`Crawler`]; non-2xx answers become
//! [`FetchError::Status`].

use std::fs;
use std::path::PathBuf;

use super::{Crawler, FetchError, Headers, Response, path::resolve_under};
use crate::splice::declaration::SOURCE_MAP_HEADER;
use crate::utils::mime;

/// What an [`App`] answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl AppResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Headers::default(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request handler mounted in-process.
pub trait App {
    fn call(&self, path: &str) -> AppResponse;
}

impl<F> App for F
where
    F: Fn(&str) -> AppResponse,
{
    fn call(&self, path: &str) -> AppResponse {
        self(path)
    }
}

/// Crawler issuing every request to an in-process [`App`].
#[derive(Debug, Clone)]
pub struct AppCrawler<A> {
    app: A,
}

impl<A: App> AppCrawler<A> {
    pub const fn new(app: A) -> Self {
        Self { app }
    }
}

impl<A: App> Crawler for AppCrawler<A> {
    fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self.app.call(url);
        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: response.status,
            });
        }
        Ok(Response {
            body: response.body,
            headers: response.headers,
        })
    }
}

// ============================================================================
// StaticApp
// ============================================================================

/// Serves files beneath a root directory.
///
/// When `<file>.map` sits next to a served file, the response advertises it
/// through a `SourceMap` header, the way asset servers do for bodies that do
/// not carry an inline declaration.
#[derive(Debug, Clone)]
pub struct StaticApp {
    root: PathBuf,
}

impl StaticApp {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl App for StaticApp {
    fn call(&self, url: &str) -> AppResponse {
        let Ok(path) = resolve_under(&self.root, url) else {
            return AppResponse::with_status(403, "Forbidden");
        };
        if !path.is_file() {
            return AppResponse::with_status(404, "Not Found");
        }
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(err) => {
                crate::debug!("app"; "failed to read {}: {}", path.display(), err);
                return AppResponse::with_status(500, "Internal Server Error");
            }
        };

        let mut response = AppResponse::ok(body).header("Content-Type", mime::from_path(&path));

        let is_map = path.extension().is_some_and(|e| e == "map");
        let mut map_path = path.into_os_string();
        map_path.push(".map");
        if !is_map && PathBuf::from(map_path).is_file() {
            let request_path = url.split(['?', '#']).next().unwrap_or(url);
            response = response.header(SOURCE_MAP_HEADER, format!("{request_path}.map"));
        }
        response
    }
}
