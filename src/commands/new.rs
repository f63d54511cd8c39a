//! Create a new document

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Write a draft scaffold for `title` into the content directory.
/// `name` overrides the file name (without extension).
pub fn create_document(folio: &Folio, title: &str, name: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Utc::now().with_timezone(&folio.config.tz()?);

    let stem = match name {
        Some(name) => name.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if stem.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = folio.content_dir.join(format!("{}.md", stem));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = format!(
        "---\ntitle: {}\ndescription: \"\"\npublishedOn: {}\nstatus: draft\n---\n\nStart writing here.\n",
        serde_yaml::to_string(title)?.trim_end(),
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Document, Status};

    #[test]
    fn test_scaffold_is_a_valid_draft() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let path = create_document(&folio, "Pointers: a love letter", None).unwrap();
        assert!(path.ends_with("pointers-a-love-letter.md"));

        let doc = Document::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.title(), "Pointers: a love letter");
        assert_eq!(doc.status(), Status::Draft);
        assert!(doc.front_matter.published_on.is_some());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        create_document(&folio, "Twice", None).unwrap();
        assert!(create_document(&folio, "Twice", None).is_err());
    }
}
