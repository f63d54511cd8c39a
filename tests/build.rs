use std::fs;
use std::path::Path;

use folio::content::Status;
use folio::{DocumentError, Folio};

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let content = dir.path().join("content");

    write(
        &dir.path().join("_config.yml"),
        "title: Pointers and Prose\nurl: https://blog.example.com\nauthor: Sam\n",
    );
    write(
        &content.join("go-pointers.md"),
        r#"---
title: Go pointers, gently
description: Value vs pointer receivers
publishedOn: 2024-03-01
status: published
coverImage:
  url: images/cover.png
  alt: Memory boxes
---

Pointers are addresses.

<!-- more -->

## Receivers

See the [spec](https://go.dev/ref/spec).
"#,
    );
    write(
        &content.join("python/click.md"),
        "---\ntitle: Click or argparse\npublishedOn: 2023-11-20T08:00:00Z\nstatus: published\n---\n\nBoth are fine.\n",
    );
    write(
        &content.join("opinions.md"),
        "---\ntitle: Hot takes\nstatus: draft\n---\n\nNot ready.\n",
    );
    write(
        &content.join("archived.md"),
        "---\ntitle: Old\nstatus: archived\n---\n\nGone.\n",
    );
    write(
        &content.join("unterminated.md"),
        "---\ntitle: Broken\nstatus: published\n\nNo closing fence.\n",
    );
    write(&content.join("images/cover.png"), "not really a png");

    dir
}

fn failure_for<'a>(report: &'a folio::content::LoadReport, name: &str) -> &'a anyhow::Error {
    &report
        .failures
        .iter()
        .find(|f| f.path.ends_with(name))
        .unwrap_or_else(|| panic!("no failure recorded for {}", name))
        .error
}

#[test]
fn check_reports_bad_documents_and_keeps_the_rest() {
    let dir = site();
    let folio = Folio::new(dir.path()).unwrap();

    let report = folio.check().unwrap();
    assert_eq!(report.articles.len(), 2);
    assert_eq!(report.skipped_drafts, 1);
    assert_eq!(report.failures.len(), 2);

    let archived = failure_for(&report, "archived.md");
    assert!(matches!(
        archived.downcast_ref::<DocumentError>(),
        Some(DocumentError::InvalidStatus(_))
    ));

    let unterminated = failure_for(&report, "unterminated.md");
    assert!(matches!(
        unterminated.downcast_ref::<DocumentError>(),
        Some(DocumentError::MalformedFrontMatter(_))
    ));
}

#[test]
fn articles_are_sorted_newest_first() {
    let dir = site();
    let folio = Folio::new(dir.path()).unwrap();

    let report = folio.check().unwrap();
    let titles: Vec<_> = report.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Go pointers, gently", "Click or argparse"]);

    let first = &report.articles[0];
    assert_eq!(first.slug, "go-pointers");
    assert_eq!(first.path, "/go-pointers/");
    assert_eq!(first.permalink, "https://blog.example.com/go-pointers/");
    assert!(first.excerpt.as_deref().unwrap().contains("Pointers are addresses."));
    assert_eq!(report.articles[1].slug, "python/click");
}

#[test]
fn build_writes_pages_feed_and_assets() {
    let dir = site();
    let folio = Folio::new(dir.path()).unwrap();

    let report = folio.build(false).unwrap();
    assert_eq!(report.failures.len(), 2);

    let public = dir.path().join("public");
    let page = fs::read_to_string(public.join("go-pointers/index.html")).unwrap();
    assert!(page.contains("Go pointers, gently"));
    assert!(page.contains("<h2>Receivers</h2>"));
    assert!(page.contains(r#"<a href="https://go.dev/ref/spec">spec</a>"#));
    assert!(page.contains(r#"src="&#x2F;images&#x2F;cover.png""#));
    assert!(page.contains(r#"class="older" href="/python/click/""#));

    assert!(public.join("python/click/index.html").exists());
    assert!(!public.join("opinions/index.html").exists());
    assert!(public.join("images/cover.png").exists());

    let index = fs::read_to_string(public.join("index.html")).unwrap();
    assert!(index.contains(r#"href="/go-pointers/""#));
    assert!(index.contains("Click or argparse"));

    let feed = fs::read_to_string(public.join("atom.xml")).unwrap();
    assert_eq!(feed.matches("<entry>").count(), 2);
    assert!(feed.contains("<title>Pointers and Prose</title>"));
}

#[test]
fn strict_build_refuses_bad_documents() {
    let dir = site();
    let folio = Folio::new(dir.path()).unwrap();

    assert!(folio.build(true).is_err());
    assert!(!dir.path().join("public").exists());
}

#[test]
fn drafts_are_built_when_enabled() {
    let dir = site();
    let mut folio = Folio::new(dir.path()).unwrap();
    folio.config.render_drafts = true;

    let report = folio.build(false).unwrap();
    assert_eq!(report.skipped_drafts, 0);
    let draft = report
        .articles
        .iter()
        .find(|a| a.status == Status::Draft)
        .unwrap();
    assert_eq!(draft.title, "Hot takes");
    assert!(dir.path().join("public/opinions/index.html").exists());

    let feed = fs::read_to_string(dir.path().join("public/atom.xml")).unwrap();
    assert!(!feed.contains("Hot takes"));
}

#[test]
fn clean_removes_only_output() {
    let dir = site();
    let folio = Folio::new(dir.path()).unwrap();

    folio.build(false).unwrap();
    folio.clean().unwrap();

    assert!(!dir.path().join("public").exists());
    assert!(dir.path().join("content/go-pointers.md").exists());
}

#[test]
fn new_document_round_trips_through_check() {
    let dir = tempfile::tempdir().unwrap();
    let mut folio = Folio::new(dir.path()).unwrap();
    folio.config.render_drafts = true;

    folio.new_document("Python CLI tooling").unwrap();

    let report = folio.check().unwrap();
    assert!(!report.has_failures());
    assert_eq!(report.articles.len(), 1);
    assert_eq!(report.articles[0].slug, "python-cli-tooling");
}
