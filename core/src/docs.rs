//! Documentation snippets folded into the prompt.

use std::path::Path;

use crate::config::MAX_DOC_SNIPPETS;
use crate::error::CoreError;

/// One documentation file, paired with its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSnippet {
    pub name: String,
    pub body: String,
}

/// Reads up to [`MAX_DOC_SNIPPETS`] markdown files from `dir`.
///
/// Files are taken in directory listing order; entries without a `.md`
/// extension are skipped. A missing directory yields an empty set rather
/// than an error. A file that cannot be read is an error (the listing
/// promised it exists).
pub fn gather_docs(dir: &Path) -> Result<Vec<DocSnippet>, CoreError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(CoreError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut docs = Vec::new();
    for entry in entries {
        if docs.len() >= MAX_DOC_SNIPPETS {
            break;
        }
        let entry = entry.map_err(|source| CoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let body = std::fs::read_to_string(&path).map_err(|source| CoreError::Io {
            path: path.clone(),
            source,
        })?;
        docs.push(DocSnippet { name, body });
    }

    tracing::debug!(count = docs.len(), dir = %dir.display(), "gathered docs");
    Ok(docs)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn missing_directory_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        assert!(gather_docs(&missing).unwrap().is_empty());
    }

    #[test]
    fn skips_non_markdown_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), "# hi").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "nope").unwrap();

        let docs = gather_docs(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "readme.md");
        assert_eq!(docs[0].body, "# hi");
    }

    #[test]
    fn caps_at_twelve_files_in_listing_order() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            std::fs::write(dir.path().join(format!("doc{i:02}.md")), format!("body {i}"))
                .unwrap();
        }

        let docs = gather_docs(dir.path()).unwrap();
        assert_eq!(docs.len(), MAX_DOC_SNIPPETS);

        // Order must match what read_dir reported for the same directory.
        let listed: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        let expected: Vec<&str> = listed.iter().take(MAX_DOC_SNIPPETS).map(String::as_str).collect();
        assert_eq!(names, expected);
    }
}
