//! Configuration section definitions.
//!
//! | Module  | TOML Section | Purpose                                 |
//! |---------|--------------|-----------------------------------------|
//! | `crawl` | `[crawl]`    | Where asset URLs are fetched from       |
//! | `build` | `[build]`    | Asset list, output directory, minify    |

mod build;
mod crawl;

pub use build::BuildConfig;
pub use crawl::CrawlConfig;
