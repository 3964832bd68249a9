//! `collator build`: timestamped artifacts in the output directory.

use anyhow::Result;

use crate::build::{Build, FsWriter};
use crate::config::CollatorConfig;
use crate::log;

/// Crawl, splice and write artifacts as configured.
pub fn build_bundle(config: &CollatorConfig) -> Result<()> {
    let build = Build::new(super::crawler_for(config), config.build.assets.clone())
        .with_kind(config.build.kind);
    log!("build"; "collating {} as {}", build.basename(), build.kind());

    let artifacts = build.collate_to(&config.build.output, config.build.minify, &FsWriter)?;
    for path in artifacts.iter() {
        crate::debug!("build"; "wrote {}", path.display());
    }
    Ok(())
}
