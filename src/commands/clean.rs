//! Clean the output directory

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Remove the generated output. Content is never touched.
pub fn run(folio: &Folio) -> Result<()> {
    if folio.output_dir.exists() {
        fs::remove_dir_all(&folio.output_dir)?;
        tracing::info!("Deleted: {:?}", folio.output_dir);
    }

    Ok(())
}
