//! Configuration management for `collator.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [crawl] and [build]
//! ├── error          # ConfigError
//! ├── util           # Config discovery, path resolution
//! └── mod.rs         # CollatorConfig (this file)
//! ```
//!
//! A missing config file is fine: every field has a default and the
//! command line can supply the rest.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BuildConfig, CrawlConfig};

use util::{find_config_file, resolve_path};

use crate::cli::{Cli, Commands, CrawlArgs};
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing collator.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollatorConfig {
    /// Absolute path to the config file, when one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

impl CollatorConfig {
    /// Load configuration for `cli`.
    ///
    /// Searches upward from cwd for the config file; relative paths resolve
    /// against its directory, or against cwd when there is none.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        let root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.finalize(cli, &root);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides, then anchor paths at `root`.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        self.root = root.to_path_buf();
        self.apply_command_options(cli);
        self.crawl.root = resolve_path(&self.crawl.root, root);
        self.build.output = resolve_path(&self.build.output, root);
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Splice { crawl_args, .. } => self.apply_crawl_args(crawl_args),
            Commands::Build {
                crawl_args,
                output,
                minify,
                kind,
            } => {
                self.apply_crawl_args(crawl_args);
                Self::update_option(&mut self.build.output, output.as_ref());
                Self::update_option(&mut self.build.minify, minify.as_ref());
                if kind.is_some() {
                    self.build.kind = *kind;
                }
            }
            Commands::Lookup { .. } => {}
        }
    }

    /// Apply crawl arguments from CLI.
    fn apply_crawl_args(&mut self, args: &CrawlArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.crawl.root, args.root.as_ref());
        Self::update_option(&mut self.crawl.app, args.app.as_ref());
        if !args.assets.is_empty() {
            self.build.assets = args.assets.clone();
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !self.crawl.root.is_dir() {
            errors.push(format!(
                "[crawl] root: `{}` is not a directory",
                self.crawl.root.display()
            ));
        }
        self.build.validate(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")).into())
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> CollatorConfig {
    let (parsed, ignored) = CollatorConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
