//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::minify::AssetKind;

/// Collator: splice compiled assets into one bundle with a combined source map
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: collator.toml)
    #[arg(short = 'C', long, default_value = "collator.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Splice assets and print the combined script and source map
    #[command(visible_alias = "s")]
    Splice {
        #[command(flatten)]
        crawl_args: CrawlArgs,

        /// Write the combined script here instead of stdout
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        script: Option<PathBuf>,

        /// Write the combined source map here instead of stdout
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        map: Option<PathBuf>,
    },

    /// Splice assets and write timestamped build artifacts
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        crawl_args: CrawlArgs,

        /// Output directory for the artifacts
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// Also write a minified bundle and its source map
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,

        /// Asset language (js, css); inferred from the first asset when omitted
        #[arg(short, long)]
        kind: Option<AssetKind>,
    },

    /// Resolve a generated position through a source map file
    #[command(visible_alias = "l")]
    Lookup {
        /// Source map file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        map: PathBuf,

        /// Zero-based generated position, as LINE:COLUMN
        position: String,
    },
}

/// Shared crawl arguments for Splice and Build commands
#[derive(clap::Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Asset URLs, in output order. Overrides `[build].assets`.
    #[arg(value_name = "URL")]
    pub assets: Vec<String>,

    /// Directory asset URLs resolve against
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Fetch through the in-process static app (headers included)
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub app: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Crawl arguments of the current command, if it crawls.
    pub const fn crawl_args(&self) -> Option<&CrawlArgs> {
        match &self.command {
            Commands::Splice { crawl_args, .. } | Commands::Build { crawl_args, .. } => {
                Some(crawl_args)
            }
            Commands::Lookup { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "collator", "build", "/js/a.js", "/js/b.js", "-r", "public", "-o", "dist", "-m",
            "--kind", "css",
        ])
        .unwrap();
        let Commands::Build {
            crawl_args,
            output,
            minify,
            kind,
        } = cli.command
        else {
            panic!("expected build");
        };
        assert_eq!(crawl_args.assets, ["/js/a.js", "/js/b.js"]);
        assert_eq!(crawl_args.root, Some(PathBuf::from("public")));
        assert_eq!(output, Some(PathBuf::from("dist")));
        assert_eq!(minify, Some(true));
        assert_eq!(kind, Some(AssetKind::Css));
    }

    #[test]
    fn test_parse_minify_false() {
        let cli = Cli::try_parse_from(["collator", "b", "--minify", "false"]).unwrap();
        assert!(matches!(cli.command, Commands::Build { minify: Some(false), .. }));
        assert!(cli.crawl_args().unwrap().assets.is_empty());
    }

    #[test]
    fn test_parse_splice_and_lookup() {
        let cli = Cli::try_parse_from(["collator", "splice", "--app", "-V", "/a.js"]).unwrap();
        let args = cli.crawl_args().unwrap();
        assert_eq!(args.app, Some(true));
        assert!(args.verbose);

        let cli = Cli::try_parse_from(["collator", "lookup", "out.map", "3:14"]).unwrap();
        assert!(cli.crawl_args().is_none());
        assert_eq!(cli.config, PathBuf::from("collator.toml"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["collator", "build", "--kind", "ts"]).is_err());
    }
}
