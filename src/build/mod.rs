//! Build orchestration.
//!
//! Build pipeline phases:
//! - **Crawl** - fetch every asset, in order, plus its declared source map
//! - **Splice** - feed each asset into a [`Splicer`]
//! - **Write** - combined bundle + map under a UTC-minute basename
//! - **Minify** - optional minified bundle + map composed onto the originals

mod artifact;
mod locate;

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::crawler::Crawler;
use crate::logger::ProgressLine;
use crate::minify::AssetKind;
use crate::splice::{Splicer, source_map_url_from};
use crate::utils::date::{DateTimeUtc, build_basename};
use crate::{debug, log};

pub use artifact::{ArtifactWriter, Artifacts, FsWriter, MemoryWriter};
pub use locate::{MapLocation, locate_map};

/// One fetched asset and, when it declares one, its map.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub url: String,
    pub body: String,
    /// The declared map reference, as written in the asset or header.
    pub map_url: Option<String>,
    pub map: Option<String>,
}

/// A collation run over an ordered list of asset URLs.
pub struct Build<C> {
    crawler: C,
    assets: Vec<String>,
    kind: Option<AssetKind>,
    basename: String,
    quiet: bool,
}

impl<C: Crawler> Build<C> {
    /// Artifacts are named after the current UTC minute.
    pub fn new(crawler: C, assets: Vec<String>) -> Self {
        Self {
            crawler,
            assets,
            kind: None,
            basename: build_basename(DateTimeUtc::now()),
            quiet: false,
        }
    }

    pub fn at(mut self, at: DateTimeUtc) -> Self {
        self.basename = build_basename(at);
        self
    }

    pub fn with_kind(mut self, kind: Option<AssetKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Configured kind, else inferred from the first asset, else JS.
    pub fn kind(&self) -> AssetKind {
        self.kind
            .or_else(|| self.assets.first().and_then(|url| AssetKind::from_url(url)))
            .unwrap_or_default()
    }

    /// Name of the combined bundle, e.g. `build.2024.06.15.14.30.js`.
    pub fn combined_name(&self) -> String {
        format!("{}.{}", self.basename, self.kind().extension())
    }

    /// Fetch `url` and the map it declares.
    pub fn fetch(&self, url: &str) -> Result<FetchedAsset> {
        let response = self
            .crawler
            .get(url)
            .with_context(|| format!("Failed to fetch {url}"))?;

        let Some(map_url) = source_map_url_from(&response.body, &response.headers) else {
            debug!("crawl"; "fetched {}", url);
            return Ok(FetchedAsset {
                url: url.to_owned(),
                body: response.body,
                map_url: None,
                map: None,
            });
        };

        let map = match locate_map(url, &map_url)
            .with_context(|| format!("Failed to locate source map of {url}"))?
        {
            MapLocation::Inline(json) => json,
            MapLocation::Url(map_location) => {
                self.crawler
                    .get(&map_location)
                    .with_context(|| format!("Failed to fetch source map {map_location} of {url}"))?
                    .body
            }
        };
        debug!("crawl"; "fetched {} + source map {}", url, map_url);

        Ok(FetchedAsset {
            url: url.to_owned(),
            body: response.body,
            map_url: Some(map_url),
            map: Some(map),
        })
    }

    /// Crawl every asset, in order, into a fresh splicer.
    pub fn crawl_and_splice(&self) -> Result<Splicer> {
        if self.assets.is_empty() {
            bail!("no assets to splice");
        }

        let mut splicer = Splicer::new().with_file(self.combined_name());
        let progress =
            (!self.quiet).then(|| ProgressLine::new("crawl", &[("assets", self.assets.len())]));

        for url in &self.assets {
            let asset = self.fetch(url)?;
            splicer.add_script(&asset.url, &asset.body, asset.map.as_deref())?;
            if let Some(p) = &progress {
                p.inc("assets");
            }
        }

        if let Some(p) = progress {
            p.finish();
        }
        Ok(splicer)
    }

    /// The combined script and its v3 source map JSON.
    pub fn spliced_script_and_sourcemap(&self) -> Result<(String, String)> {
        let splicer = self.crawl_and_splice()?;
        let map = splicer.compile_sourcemap_string()?;
        Ok((splicer.compile_script_string().to_owned(), map))
    }

    /// Crawl, splice and write artifacts into `dir`, minifying when asked.
    ///
    /// Writes `<base>.<ext>` and `<base>.map`; with `minify` also
    /// `<base>.min.<ext>` and, when the minifier yields a map,
    /// `<base>.min.map`. Each bundle ends with a declaration pointing at its
    /// map by basename.
    pub fn collate_to(
        &self,
        dir: &Path,
        minify: bool,
        writer: &dyn ArtifactWriter,
    ) -> Result<Artifacts> {
        let kind = self.kind();
        let output = self.crawl_and_splice()?.finish();
        let ext = kind.extension();

        let combined_map_name = format!("{}.map", self.basename);
        let mut combined = output.script.clone();
        combined.push_str(&kind.sourcemap_comment(&combined_map_name));

        let mut artifacts = Artifacts {
            combined: dir.join(self.combined_name()),
            combined_map: dir.join(&combined_map_name),
            minified: None,
            minified_map: None,
        };
        writer.write(&artifacts.combined, combined.as_bytes())?;
        writer.write(&artifacts.combined_map, output.sourcemap_string()?.as_bytes())?;

        if minify {
            let min_name = format!("{}.min.{ext}", self.basename);
            let min_map_name = format!("{}.min.map", self.basename);
            if !self.quiet {
                log!("minify"; "minifying {} with {}", min_name, minifier_name(kind));
            }

            let minified = kind
                .minifier()
                .minify(&output.script, &output.mapping, &min_name)
                .with_context(|| format!("Failed to minify {}", self.combined_name()))?;

            let mut code = minified.code;
            if let Some(map) = minified.map {
                code.push('\n');
                code.push_str(&kind.sourcemap_comment(&min_map_name));

                let path = dir.join(&min_map_name);
                writer.write(&path, map.to_json(Some(min_name.as_str()))?.as_bytes())?;
                artifacts.minified_map = Some(path);
            }

            let path = dir.join(&min_name);
            writer.write(&path, code.as_bytes())?;
            artifacts.minified = Some(path);
        }

        if !self.quiet {
            log!(
                "build";
                "{} ({} lines from {}) written to {}",
                self.combined_name(),
                output.segments.iter().map(|s| s.line_count).sum::<u32>(),
                plural_count(output.segments.len(), "asset"),
                dir.display()
            );
        }
        Ok(artifacts)
    }
}

const fn minifier_name(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Js => "oxc",
        AssetKind::Css => "lightningcss",
    }
}

fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{AppCrawler, AppResponse, FetchError, FilesystemCrawler, StaticApp};
    use crate::splice::{SpliceError, parse_mapping};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// `a.js` maps onto `a.ts` lines 10 and 11.
    const A_MAP: &str =
        r#"{"version":3,"sources":["a.ts"],"names":[],"mappings":"AAUA;AACA"}"#;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        fs::write(
            dir.path().join("js/a.js"),
            "var a = 1;\nvar b = 2;\n//# sourceMappingURL=a.js.map\n",
        )
        .unwrap();
        fs::write(dir.path().join("js/a.js.map"), A_MAP).unwrap();
        fs::write(dir.path().join("js/b.js"), "var c = a + b;\n").unwrap();
        dir
    }

    fn at() -> DateTimeUtc {
        DateTimeUtc::new(2024, 6, 15, 14, 30, 0)
    }

    fn build(root: &Path, assets: &[&str]) -> Build<FilesystemCrawler> {
        Build::new(
            FilesystemCrawler::new(root),
            assets.iter().map(|s| (*s).to_owned()).collect(),
        )
        .at(at())
        .quiet(true)
    }

    #[test]
    fn test_fetch_follows_declaration() {
        let dir = site();
        let asset = build(dir.path(), &[]).fetch("/js/a.js").unwrap();
        assert_eq!(asset.map_url.as_deref(), Some("a.js.map"));
        assert_eq!(asset.map.as_deref(), Some(A_MAP));

        let plain = build(dir.path(), &[]).fetch("/js/b.js").unwrap();
        assert!(plain.map.is_none());
    }

    #[test]
    fn test_spliced_script_and_sourcemap() {
        let dir = site();
        let (script, map) = build(dir.path(), &["/js/a.js", "/js/b.js"])
            .spliced_script_and_sourcemap()
            .unwrap();
        assert_eq!(script, "var a = 1;\nvar b = 2;\nvar c = a + b;\n");

        let mapping = parse_mapping(&map).unwrap();
        let first = mapping.lookup(0, 0).unwrap();
        assert_eq!((first.source, first.original.line), ("a.ts", 10));
        let last = mapping.lookup(2, 3).unwrap();
        assert_eq!((last.source, last.original.line), ("/js/b.js", 0));
        assert!(map.contains(r#""file":"build.2024.06.15.14.30.js""#));
    }

    #[test]
    fn test_missing_asset_aborts() {
        let dir = site();
        let err = build(dir.path(), &["/js/a.js", "/js/nope.js"])
            .crawl_and_splice()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_map_aborts() {
        let dir = site();
        fs::remove_file(dir.path().join("js/a.js.map")).unwrap();
        let err = build(dir.path(), &["/js/a.js"]).crawl_and_splice().unwrap_err();
        assert!(err.to_string().contains("a.js.map"));
    }

    #[test]
    fn test_malformed_map_aborts() {
        let dir = site();
        fs::write(dir.path().join("js/a.js.map"), "{ not json").unwrap();
        let err = build(dir.path(), &["/js/a.js"]).crawl_and_splice().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SpliceError>(),
            Some(SpliceError::MalformedMap { .. })
        ));
    }

    #[test]
    fn test_no_assets() {
        let dir = site();
        assert!(build(dir.path(), &[]).crawl_and_splice().is_err());
    }

    #[test]
    fn test_inline_data_map() {
        let dir = site();
        // {"version":3,"sources":["x.ts"],"names":[],"mappings":"AAAA"}
        fs::write(
            dir.path().join("js/x.js"),
            "x();\n//# sourceMappingURL=data:application/json;charset=utf-8,\
             %7B%22version%22%3A3%2C%22sources%22%3A%5B%22x.ts%22%5D%2C%22names%22%3A%5B%5D%2C%22mappings%22%3A%22AAAA%22%7D",
        )
        .unwrap();
        let splicer = build(dir.path(), &["/js/x.js"]).crawl_and_splice().unwrap();
        assert_eq!(splicer.compile_script_string(), "x();\n");
        assert_eq!(splicer.mapping().sources(), ["x.ts"]);
    }

    #[test]
    fn test_app_crawler_uses_map_header() {
        let dir = site();
        fs::write(dir.path().join("js/h.js"), "h();\n").unwrap();
        fs::write(dir.path().join("js/h.js.map"), A_MAP.replace("AAUA;AACA", "AAUA")).unwrap();

        let build = Build::new(
            AppCrawler::new(StaticApp::new(dir.path())),
            vec!["/js/h.js".into()],
        )
        .quiet(true);
        let splicer = build.crawl_and_splice().unwrap();
        assert_eq!(splicer.mapping().sources(), ["a.ts"]);
    }

    #[test]
    fn test_closure_app_status_error() {
        let app = |path: &str| match path {
            "/ok.js" => AppResponse::ok("ok();"),
            _ => AppResponse::with_status(500, "boom"),
        };
        let build = Build::new(AppCrawler::new(app), vec!["/ok.js".into(), "/bad.js".into()])
            .quiet(true);
        let err = build.crawl_and_splice().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_kind_inference() {
        let dir = site();
        assert_eq!(build(dir.path(), &["/css/site.css"]).kind(), AssetKind::Css);
        assert_eq!(build(dir.path(), &["/weird"]).kind(), AssetKind::Js);
        assert_eq!(
            build(dir.path(), &["/js/a.js"]).with_kind(Some(AssetKind::Css)).kind(),
            AssetKind::Css
        );
    }

    #[test]
    fn test_collate_without_minify() {
        let dir = site();
        let writer = MemoryWriter::new();
        let out = PathBuf::from("dist");

        let artifacts = build(dir.path(), &["/js/a.js", "/js/b.js"])
            .collate_to(&out, false, &writer)
            .unwrap();
        assert_eq!(artifacts.combined, out.join("build.2024.06.15.14.30.js"));
        assert!(artifacts.minified.is_none());
        assert_eq!(
            writer.paths(),
            [artifacts.combined.clone(), artifacts.combined_map.clone()]
        );

        let combined = writer.read(&artifacts.combined).unwrap();
        assert!(combined.ends_with("var c = a + b;\n//# sourceMappingURL=build.2024.06.15.14.30.map"));
        assert!(writer.read(&artifacts.combined_map).unwrap().contains("a.ts"));
    }

    #[test]
    fn test_collate_with_minify_to_disk() {
        let dir = site();
        let out = dir.path().join("dist");

        let artifacts = build(dir.path(), &["/js/a.js", "/js/b.js"])
            .collate_to(&out, true, &FsWriter)
            .unwrap();

        let min_path = artifacts.minified.unwrap();
        assert_eq!(min_path, out.join("build.2024.06.15.14.30.min.js"));
        let min = fs::read_to_string(&min_path).unwrap();
        assert!(min.ends_with("\n//# sourceMappingURL=build.2024.06.15.14.30.min.map"));

        let map_path = artifacts.minified_map.unwrap();
        let mapping = parse_mapping(&fs::read_to_string(map_path).unwrap()).unwrap();
        assert!(mapping.sources().iter().any(|s| s == "a.ts"));
        assert!(mapping.sources().iter().all(|s| s != "build.2024.06.15.14.30.js"));
    }
}
