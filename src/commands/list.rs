//! List site content

use anyhow::Result;
use serde::Serialize;

use crate::content::ContentLoader;
use crate::Folio;

#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    date: Option<String>,
    status: &'a str,
    title: &'a str,
    source: &'a str,
    path: &'a str,
}

/// Print every loadable article, newest first
pub fn run(folio: &Folio, json: bool) -> Result<()> {
    let mut config = folio.config.clone();
    config.render_drafts = true;
    let folio = Folio::with_config(folio.base_dir.clone(), config);

    let loader = ContentLoader::new(&folio)?;
    let report = loader.load()?;

    let entries: Vec<ListEntry> = report
        .articles
        .iter()
        .map(|a| ListEntry {
            date: a.published_on.map(|dt| dt.format("%Y-%m-%d").to_string()),
            status: a.status.as_str(),
            title: &a.title,
            source: &a.source,
            path: &a.path,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Articles ({}):", entries.len());
        for entry in &entries {
            println!(
                "  {:<10} {:<9} {} [{}]",
                entry.date.as_deref().unwrap_or("-"),
                entry.status,
                entry.title,
                entry.source
            );
        }
    }

    report.log_failures();

    Ok(())
}
