//! Built-in templates using the Tera template engine
//!
//! The default theme is embedded in the binary, so a site needs nothing but
//! its content directory to build.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{plain_text, Article};
use crate::helpers::{asset_url, time_tag, truncate, url_for};

/// Length of the generated summary used when a document has no description
const SUMMARY_LENGTH: usize = 160;

/// Template renderer with the embedded default theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("article.html", include_str!("default/article.html")),
            ("index.html", include_str!("default/index.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
    pub feed_path: String,
    pub generator_version: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.normalized_root(),
            feed_path: url_for(config, "atom.xml"),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub title: String,
    pub description: String,
    /// Description, or the start of the text when there is none
    pub summary: String,
    /// Rendered `<time>` element, empty when undated
    pub time_tag: String,
    pub cover: Option<CoverData>,
    pub tags: Vec<String>,
    pub content: String,
    pub excerpt: Option<String>,
    pub path: String,
    pub permalink: String,
    pub word_count: usize,
    pub draft: bool,
}

impl ArticleData {
    pub fn from_article(article: &Article, config: &SiteConfig) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            summary: summary(article),
            time_tag: article
                .published_on
                .map(|dt| time_tag(&dt, &config.date_format))
                .unwrap_or_default(),
            cover: article.cover_image.as_ref().map(|cover| CoverData {
                url: asset_url(config, &cover.url),
                alt: cover.alt.clone(),
            }),
            tags: article.tags.clone(),
            content: article.content.clone(),
            excerpt: article.excerpt.clone(),
            path: article.path.clone(),
            permalink: article.permalink.clone(),
            word_count: article.word_count,
            draft: !article.is_published(),
        }
    }
}

fn summary(article: &Article) -> String {
    if !article.description.is_empty() {
        return article.description.clone();
    }
    let text = plain_text(&article.raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    truncate(&text, SUMMARY_LENGTH, None)
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverData {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavArticle {
    pub title: String,
    pub path: String,
}

impl NavArticle {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            path: article.path.clone(),
        }
    }
}
