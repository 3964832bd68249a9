//! `collator splice`: combined script and map on stdout or into files.

use std::io::{Write, stdout};
use std::path::Path;

use anyhow::Result;

use crate::build::{ArtifactWriter, Build, FsWriter};
use crate::config::CollatorConfig;
use crate::log;

/// Splice the configured assets.
///
/// Without `--script`/`--map` the script goes to stdout followed by the map
/// JSON on its own line.
pub fn run(config: &CollatorConfig, script: Option<&Path>, map: Option<&Path>) -> Result<()> {
    let to_stdout = script.is_none() && map.is_none();
    let build = Build::new(super::crawler_for(config), config.build.assets.clone())
        .with_kind(config.build.kind)
        .quiet(to_stdout);
    let (combined, sourcemap) = build.spliced_script_and_sourcemap()?;

    write_or_print(script, &combined, &FsWriter)?;
    write_or_print(map, &sourcemap, &FsWriter)?;
    Ok(())
}

fn write_or_print(path: Option<&Path>, content: &str, writer: &dyn ArtifactWriter) -> Result<()> {
    match path {
        Some(path) => {
            writer.write(path, content.as_bytes())?;
            log!("splice"; "wrote {}", path.display());
        }
        None => {
            let mut out = stdout().lock();
            writeln!(out, "{}", content.trim_end())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_splice_to_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "a();\n").unwrap();
        fs::write(dir.path().join("b.js"), "b();\n").unwrap();

        let mut config = CollatorConfig::default();
        config.crawl.root = dir.path().to_path_buf();
        config.build.assets = vec!["/a.js".into(), "/b.js".into()];

        let script = dir.path().join("out/bundle.js");
        let map = dir.path().join("out/bundle.map");
        run(&config, Some(&script), Some(&map)).unwrap();

        assert_eq!(fs::read_to_string(&script).unwrap(), "a();\nb();\n");
        let map = fs::read_to_string(&map).unwrap();
        assert!(map.contains(r#""sources":["/a.js","/b.js"]"#));
    }
}
