//! Document and Article models

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

use super::frontmatter::{CoverImage, FrontMatter, Status};
use crate::error::DocumentError;

/// A source document: validated front-matter plus the Markdown body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
}

impl Document {
    /// Parse a document, reading offset-less timestamps as UTC
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        Self::parse_in(content, Tz::UTC)
    }

    /// Parse a document, reading offset-less timestamps in `tz`
    pub fn parse_in(content: &str, tz: Tz) -> Result<Self, DocumentError> {
        let (front_matter, body) = FrontMatter::parse_in(content, tz)?;
        if body.trim().is_empty() {
            return Err(DocumentError::EmptyBody);
        }

        Ok(Self {
            front_matter,
            body: body.to_string(),
        })
    }

    /// Serialize back into front-matter delimited Markdown
    pub fn to_source(&self) -> Result<String, DocumentError> {
        Ok(format!(
            "---\n{}---\n\n{}",
            self.front_matter.to_yaml()?,
            self.body
        ))
    }

    pub fn title(&self) -> &str {
        &self.front_matter.title
    }

    pub fn status(&self) -> Status {
        self.front_matter.status
    }

    pub fn is_published(&self) -> bool {
        self.front_matter.is_published()
    }
}

/// A rendered document, ready for templates
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub published_on: Option<DateTime<FixedOffset>>,
    pub status: Status,
    pub cover_image: Option<CoverImage>,
    pub tags: Vec<String>,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Rendered excerpt (before <!-- more -->)
    pub excerpt: Option<String>,

    /// Slug (URL-friendly name, from the file stem)
    pub slug: String,

    /// Source file path relative to the content dir
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (with root, trailing slash)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    pub word_count: usize,

    /// Custom front-matter fields
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Article {
    /// Create an article from a parsed document, leaving rendered fields empty
    pub fn new(document: Document, slug: String, source: String) -> Self {
        let Document { front_matter, body } = document;
        Self {
            title: front_matter.title,
            description: front_matter.description,
            published_on: front_matter.published_on,
            status: front_matter.status,
            cover_image: front_matter.cover_image,
            tags: front_matter.tags,
            raw: body,
            content: String::new(),
            excerpt: None,
            slug,
            full_source: PathBuf::from(&source),
            source,
            path: String::new(),
            permalink: String::new(),
            word_count: 0,
            extra: front_matter.extra,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }

    /// Get the newer neighbour in a newest-first list
    pub fn newer<'a>(&self, articles: &'a [Article]) -> Option<&'a Article> {
        let pos = articles.iter().position(|a| a.source == self.source)?;
        pos.checked_sub(1).map(|i| &articles[i])
    }

    /// Get the older neighbour in a newest-first list
    pub fn older<'a>(&self, articles: &'a [Article]) -> Option<&'a Article> {
        let pos = articles.iter().position(|a| a.source == self.source)?;
        articles.get(pos + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "---
title: Why I stopped using global flags
status: draft
---

Opinions follow.
";

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SOURCE).unwrap();
        assert_eq!(doc.title(), "Why I stopped using global flags");
        assert_eq!(doc.status(), Status::Draft);
        assert_eq!(doc.body, "Opinions follow.\n");
    }

    #[test]
    fn test_empty_body_rejected() {
        let err = Document::parse("---\ntitle: T\nstatus: draft\n---\n\n   \n").unwrap_err();
        assert!(matches!(err, DocumentError::EmptyBody));
    }

    #[test]
    fn test_edit_in_place_and_reserialize() {
        let mut doc = Document::parse(SOURCE).unwrap();
        doc.front_matter.status = Status::Published;
        doc.body.push_str("\nAn addendum.\n");

        let again = Document::parse(&doc.to_source().unwrap()).unwrap();
        assert!(again.is_published());
        assert_eq!(again, doc);
    }

    fn article(source: &str) -> Article {
        let doc = Document::parse(SOURCE).unwrap();
        Article::new(doc, source.to_string(), source.to_string())
    }

    #[test]
    fn test_neighbours() {
        let articles = vec![article("a.md"), article("b.md"), article("c.md")];
        let middle = &articles[1];
        assert_eq!(middle.newer(&articles).unwrap().source, "a.md");
        assert_eq!(middle.older(&articles).unwrap().source, "c.md");
        assert!(articles[0].newer(&articles).is_none());
        assert!(articles[2].older(&articles).is_none());
    }
}
