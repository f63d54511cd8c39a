//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a URL path
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/images/cover.png") // -> "/blog/images/cover.png"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.normalized_root();
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    format!("{}/{}", root, path)
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.url.trim_end_matches('/'), url_for(config, path))
}

/// Resolve an asset reference from front-matter (e.g. a cover image).
/// External URLs are left alone, local paths are rooted and percent-encoded.
pub fn asset_url(config: &SiteConfig, reference: &str) -> String {
    if is_external(reference) {
        reference.to_string()
    } else {
        url_for(config, &encode_path(reference))
    }
}

/// Percent-encode a URL path, keeping `/` separators
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

fn is_external(reference: &str) -> bool {
    reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("//")
        || reference.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/blog/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/blog/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/blog/about/");
        assert_eq!(url_for(&config, ""), "/blog/");
        assert_eq!(url_for(&SiteConfig::default(), "go-pointers/"), "/go-pointers/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/blog/about/"
        );
    }

    #[test]
    fn test_asset_url() {
        let config = test_config();
        assert_eq!(
            asset_url(&config, "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            asset_url(&config, "images/my cover.png"),
            "/blog/images/my%20cover.png"
        );
    }
}
