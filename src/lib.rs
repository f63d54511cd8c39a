//! folio: a small static publisher for Markdown articles
//!
//! Documents are Markdown files with a YAML front-matter block. Each one is
//! parsed and validated independently, rendered to HTML, and written into a
//! static output directory together with an index page and an Atom feed.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

pub use error::DocumentError;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the optional site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content (document store) directory
    pub content_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Folio instance from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let output_dir = base_dir.join(&config.output_dir);

        Self {
            config,
            base_dir,
            content_dir,
            output_dir,
        }
    }

    /// Check every document without writing output
    pub fn check(&self) -> Result<content::LoadReport> {
        commands::check::run(self)
    }

    /// Build the static site
    pub fn build(&self, strict: bool) -> Result<content::LoadReport> {
        commands::build::run(self, strict)
    }

    /// Clean the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new draft document
    pub fn new_document(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_document(self, title, None)
    }
}
