//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// IANA timezone for timestamps written without an offset
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub output_dir: String,

    // Writing
    pub render_drafts: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Date format (chrono strftime)
    pub date_format: String,

    // Feed
    pub feed_limit: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: String::new(),
            author: "Anonymous".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            output_dir: "public".to_string(),

            render_drafts: false,
            highlight: HighlightConfig::default(),

            date_format: "%Y-%m-%d".to_string(),

            feed_limit: 20,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.tz()?;
        Ok(config)
    }

    /// Resolve the configured timezone, UTC when unset
    pub fn tz(&self) -> Result<Tz> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(Tz::UTC);
        }
        name.parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone `{}`: {}", name, e))
    }

    /// Root path, always with leading and trailing slash
    pub fn normalized_root(&self) -> String {
        let trimmed = self.root.trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Folio");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.tz().unwrap(), Tz::UTC);
        assert!(config.highlight.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Pointers and Prose
author: Test User
timezone: America/New_York
render_drafts: true
highlight:
  line_number: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Pointers and Prose");
        assert_eq!(config.author, "Test User");
        assert!(config.render_drafts);
        assert!(!config.highlight.line_number);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert_eq!(config.tz().unwrap(), chrono_tz::America::New_York);
    }

    #[test]
    fn test_invalid_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..SiteConfig::default()
        };
        assert!(config.tz().is_err());
    }

    #[test]
    fn test_normalized_root() {
        let mut config = SiteConfig::default();
        assert_eq!(config.normalized_root(), "/");
        config.root = "blog".to_string();
        assert_eq!(config.normalized_root(), "/blog/");
    }
}
