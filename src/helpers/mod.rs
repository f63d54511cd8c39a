//! Helper functions shared by the renderer, templates and feed
//!
//! URL building, date formatting and small HTML utilities.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
