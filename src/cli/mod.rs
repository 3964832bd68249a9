//! Command-line interface module.

mod args;
pub mod build;
pub mod lookup;
pub mod splice;

pub use args::{Cli, Commands, CrawlArgs};

use crate::config::CollatorConfig;
use crate::crawler::{AppCrawler, Crawler, FilesystemCrawler, StaticApp};

/// The crawler `[crawl]` asks for.
pub fn crawler_for(config: &CollatorConfig) -> Box<dyn Crawler> {
    let root = config.crawl.root.clone();
    if config.crawl.app {
        Box::new(AppCrawler::new(StaticApp::new(root)))
    } else {
        Box::new(FilesystemCrawler::new(root))
    }
}
