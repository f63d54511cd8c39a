//! Generator module - writes the static site using the built-in templates

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;
use tera::Context;
use walkdir::WalkDir;

use crate::content::loader::is_markdown_file;
use crate::content::Article;
use crate::helpers::{escape_xml, full_url_for, strip_invalid_xml_chars};
use crate::templates::{ArticleData, NavArticle, SiteData, TemplateRenderer};
use crate::Folio;

/// Static site generator
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            folio: folio.clone(),
            renderer,
        })
    }

    /// Generate the entire site from articles sorted newest first
    pub fn generate(&self, articles: &[Article]) -> Result<()> {
        fs::create_dir_all(&self.folio.output_dir)?;

        // Copy images and other non-markdown files
        self.copy_content_assets()?;

        let site = SiteData::from_config(&self.folio.config);

        self.generate_article_pages(articles, &site)?;
        self.generate_index_page(articles, &site)?;
        self.generate_atom_feed(articles)?;

        Ok(())
    }

    fn generate_article_pages(&self, articles: &[Article], site: &SiteData) -> Result<()> {
        for article in articles {
            let mut context = Context::new();
            context.insert("site", site);
            context.insert(
                "article",
                &ArticleData::from_article(article, &self.folio.config),
            );
            context.insert(
                "newer",
                &article.newer(articles).map(NavArticle::from_article),
            );
            context.insert(
                "older",
                &article.older(articles).map(NavArticle::from_article),
            );

            let html = self.renderer.render("article.html", &context)?;

            let output_path = self
                .folio
                .output_dir
                .join(&article.slug)
                .join("index.html");
            write_file(&output_path, &html)?;
            tracing::debug!("Generated article: {:?}", output_path);
        }

        Ok(())
    }

    fn generate_index_page(&self, articles: &[Article], site: &SiteData) -> Result<()> {
        let article_data: Vec<ArticleData> = articles
            .iter()
            .map(|a| ArticleData::from_article(a, &self.folio.config))
            .collect();

        let mut context = Context::new();
        context.insert("site", site);
        context.insert("articles", &article_data);

        let html = self.renderer.render("index.html", &context)?;
        write_file(&self.folio.output_dir.join("index.html"), &html)?;
        tracing::debug!("Generated index.html");

        Ok(())
    }

    fn generate_atom_feed(&self, articles: &[Article]) -> Result<()> {
        let config = &self.folio.config;
        let site_url = full_url_for(config, "");

        let updated = articles
            .iter()
            .filter_map(|a| a.published_on)
            .max()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            escape_xml(&full_url_for(config, "atom.xml"))
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", escape_xml(&site_url)));
        feed.push_str(&format!("  <updated>{}</updated>\n", updated));
        feed.push_str(&format!("  <id>{}</id>\n", escape_xml(&site_url)));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for article in articles
            .iter()
            .filter(|a| a.is_published())
            .take(config.feed_limit)
        {
            let permalink = escape_xml(&article.permalink);
            feed.push_str("  <entry>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                escape_xml(&article.title)
            ));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", permalink));
            feed.push_str(&format!("    <id>{}</id>\n", permalink));
            if let Some(published) = article.published_on {
                feed.push_str(&format!(
                    "    <published>{}</published>\n",
                    published.to_rfc3339()
                ));
                feed.push_str(&format!(
                    "    <updated>{}</updated>\n",
                    published.to_rfc3339()
                ));
            }
            if !article.description.is_empty() {
                feed.push_str(&format!(
                    "    <summary>{}</summary>\n",
                    escape_xml(&article.description)
                ));
            }
            let content = article.excerpt.as_ref().unwrap_or(&article.content);
            feed.push_str(&format!(
                "    <content type=\"html\">{}</content>\n",
                escape_xml(&strip_invalid_xml_chars(content))
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        write_file(&self.folio.output_dir.join("atom.xml"), &feed)?;
        tracing::debug!("Generated atom.xml");

        Ok(())
    }

    /// Copy non-markdown files from the content dir, keeping relative paths
    fn copy_content_assets(&self) -> Result<()> {
        let content_dir = &self.folio.content_dir;
        if !content_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || is_markdown_file(path) {
                continue;
            }

            let relative = path.strip_prefix(content_dir)?;
            let dest = self.folio.output_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
        }

        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}
