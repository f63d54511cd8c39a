//! Content module - handles documents, front-matter and rendering

mod document;
mod frontmatter;
pub mod loader;
mod markdown;

pub use document::{Article, Document};
pub use frontmatter::{parse_timestamp, split, CoverImage, FrontMatter, Status};
pub use loader::{ContentLoader, LoadFailure, LoadReport};
pub use markdown::{count_words, plain_text, MarkdownRenderer, EXCERPT_MARKER};
