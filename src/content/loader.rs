//! Content loader - loads documents from the content directory

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{count_words, Article, Document, MarkdownRenderer};
use crate::helpers::{full_url_for, url_for};
use crate::Folio;

/// A document that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    /// Full source file path
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// Outcome of loading the whole content directory
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Loaded articles, newest first
    pub articles: Vec<Article>,
    /// Documents that failed to load, in source order
    pub failures: Vec<LoadFailure>,
    /// Well-formed drafts left out of the build
    pub skipped_drafts: usize,
}

impl LoadReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Log every failure as a warning
    pub fn log_failures(&self) {
        for failure in &self.failures {
            tracing::warn!("Skipped {:?}: {:#}", failure.path, failure.error);
        }
    }
}

/// Loads and renders documents from the content directory
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
    tz: Tz,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Result<Self> {
        let renderer = MarkdownRenderer::with_options(&folio.config.highlight);
        let tz = folio.config.tz()?;
        Ok(Self {
            folio,
            renderer,
            tz,
        })
    }

    /// Load every document. A bad document is reported, never fatal.
    pub fn load(&self) -> Result<LoadReport> {
        let content_dir = &self.folio.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return Ok(LoadReport::default());
        }

        let mut paths = self.document_paths();
        paths.sort();

        let results: Vec<(PathBuf, Result<Article>)> = paths
            .into_par_iter()
            .map(|path| {
                let result = self.load_article(&path);
                (path, result)
            })
            .collect();

        let mut report = LoadReport::default();
        let mut slugs: HashMap<String, String> = HashMap::new();

        for (path, result) in results {
            let article = match result {
                Ok(article) => article,
                Err(error) => {
                    report.failures.push(LoadFailure { path, error });
                    continue;
                }
            };

            if let Some(owner) = slugs.get(&article.slug) {
                let error = anyhow!("slug `{}` is already used by {}", article.slug, owner);
                report.failures.push(LoadFailure { path, error });
                continue;
            }
            slugs.insert(article.slug.clone(), article.source.clone());

            if article.is_published() || self.folio.config.render_drafts {
                report.articles.push(article);
            } else {
                tracing::debug!("Skipping draft {:?}", path);
                report.skipped_drafts += 1;
            }
        }

        // Newest first, undated last
        report.articles.sort_by(|a, b| {
            b.published_on
                .cmp(&a.published_on)
                .then_with(|| a.source.cmp(&b.source))
        });

        tracing::debug!(
            "Loaded {} articles ({} failures, {} drafts skipped)",
            report.articles.len(),
            report.failures.len(),
            report.skipped_drafts
        );

        Ok(report)
    }

    /// Load and render a single document
    pub fn load_article(&self, path: &Path) -> Result<Article> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let document = Document::parse_in(&content, self.tz)?;

        let relative = path.strip_prefix(&self.folio.content_dir).unwrap_or(path);
        let source = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let slug = slug_for(relative, document.title());

        let mut article = Article::new(document, slug, source);
        article.full_source = path.to_path_buf();

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(&article.raw);
        article.content = self.renderer.render(&full_md);
        article.excerpt = excerpt_md.map(|e| self.renderer.render(&e));
        article.word_count = count_words(&article.content);

        let config = &self.folio.config;
        let page = format!("{}/", article.slug);
        article.path = url_for(config, &page);
        article.permalink = full_url_for(config, &page);

        Ok(article)
    }

    /// All Markdown files under the content directory
    fn document_paths(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.folio.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_markdown_file(e.path()))
            .map(|e| e.into_path())
            .collect()
    }
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

/// Slug from the relative path without extension; falls back to the title
/// Slug from the content-relative path: directories kept, each segment slugified
fn slug_for(relative: &Path, title: &str) -> String {
    let without_ext = relative.with_extension("");
    let slug = without_ext
        .components()
        .map(|c| slug::slugify(c.as_os_str().to_string_lossy()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if slug.is_empty() {
        slug::slugify(title)
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file(Path::new("a/b.md")));
        assert!(is_markdown_file(Path::new("b.Markdown")));
        assert!(!is_markdown_file(Path::new("cover.png")));
        assert!(!is_markdown_file(Path::new("README")));
    }

    #[test]
    fn test_slug_for() {
        assert_eq!(
            slug_for(Path::new("Go Pointers.md"), "ignored"),
            "go-pointers"
        );
        assert_eq!(
            slug_for(Path::new("python/Click vs Argparse.md"), "ignored"),
            "python/click-vs-argparse"
        );
        assert_eq!(slug_for(Path::new("python/!!!.md"), "ignored"), "python");
        assert_eq!(slug_for(Path::new("!!!.md"), "Fallback Title"), "fallback-title");
    }
}
