//! Validate every document without writing output

use anyhow::Result;

use crate::content::{ContentLoader, LoadReport};
use crate::Folio;

/// Load and validate the whole content directory
pub fn run(folio: &Folio) -> Result<LoadReport> {
    let loader = ContentLoader::new(folio)?;
    let report = loader.load()?;

    tracing::info!(
        "Checked {} documents: {} ok, {} drafts skipped, {} failed",
        report.articles.len() + report.skipped_drafts + report.failures.len(),
        report.articles.len() + report.skipped_drafts,
        report.skipped_drafts,
        report.failures.len()
    );

    Ok(report)
}
