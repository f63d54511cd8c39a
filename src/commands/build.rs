//! Build the static site

use anyhow::Result;

use crate::content::{ContentLoader, LoadReport};
use crate::generator::Generator;
use crate::Folio;

/// Load, render and write the site. Bad documents are skipped and
/// reported unless `strict` is set, in which case nothing is written.
pub fn run(folio: &Folio, strict: bool) -> Result<LoadReport> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(folio)?;
    let report = loader.load()?;

    tracing::info!(
        "Loaded {} articles ({} drafts skipped)",
        report.articles.len(),
        report.skipped_drafts
    );
    report.log_failures();

    if strict && report.has_failures() {
        anyhow::bail!(
            "{} document(s) failed to load, nothing was written",
            report.failures.len()
        );
    }

    let generator = Generator::new(folio)?;
    generator.generate(&report.articles)?;

    let duration = start.elapsed();
    tracing::info!("Built in {:.2}s", duration.as_secs_f64());

    Ok(report)
}
