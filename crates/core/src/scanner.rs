//! Enumerates input directories and loads the supported documents.
//!
//! Entries are returned sorted by file name rather than in filesystem order,
//! because ranking ties are broken by corpus order.

use crate::config::ReferencePolicy;
use crate::error::ScreenError;
use crate::models::{DocFormat, RawDocument};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Load every PDF and DOCX file directly inside `dir`.
pub fn load(dir: &Path, excludes: &[String]) -> Result<Vec<RawDocument>, ScreenError> {
    let exclude_set = build_globset(excludes)?;
    let docs: Vec<RawDocument> = list_supported(dir, &exclude_set)?
        .into_iter()
        .map(|(path, format)| read_document(path, format))
        .collect();
    info!(dir = %dir.display(), count = docs.len(), "loaded candidate documents");
    Ok(docs)
}

/// Locate the single job description PDF in `dir`.
pub fn find_reference(dir: &Path, policy: ReferencePolicy) -> Result<RawDocument, ScreenError> {
    let mut pdfs: Vec<PathBuf> = list_supported(dir, &GlobSet::empty())?
        .into_iter()
        .filter(|(_, format)| *format == DocFormat::Pdf)
        .map(|(path, _)| path)
        .collect();

    if pdfs.is_empty() {
        return Err(ScreenError::MissingReferenceDocument {
            dir: dir.to_path_buf(),
        });
    }
    if pdfs.len() > 1 {
        let candidates: Vec<String> = pdfs.iter().map(|p| file_name(p)).collect();
        match policy {
            ReferencePolicy::Strict => {
                return Err(ScreenError::AmbiguousReferenceDocument {
                    dir: dir.to_path_buf(),
                    candidates,
                })
            }
            ReferencePolicy::FirstSorted => {
                warn!(
                    dir = %dir.display(),
                    candidates = ?candidates,
                    "several job descriptions found, using the first by name"
                );
            }
        }
    }
    let path = pdfs.remove(0);
    Ok(read_document(path, DocFormat::Pdf))
}

fn list_supported(
    dir: &Path,
    excludes: &GlobSet,
) -> Result<Vec<(PathBuf, DocFormat)>, ScreenError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(0)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(source) if source.depth() == 0 => {
                return Err(ScreenError::DirectoryUnreadable {
                    dir: dir.to_path_buf(),
                    source,
                })
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.depth() == 0 {
            if !entry.file_type().is_dir() {
                return Err(ScreenError::InvalidConfig(format!(
                    "{} is not a directory",
                    dir.display()
                )));
            }
            continue;
        }

        let path = entry.path();
        if !entry.file_type().is_file() || is_hidden(path) || is_excluded(path, excludes) {
            continue;
        }
        match DocFormat::from_path(path) {
            Some(format) => found.push((path.to_path_buf(), format)),
            None => debug!(path = %path.display(), "unsupported extension, skipped"),
        }
    }
    Ok(found)
}

fn read_document(path: PathBuf, format: DocFormat) -> RawDocument {
    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            // Keep the document so it still shows up in the ranking, with no text.
            warn!(path = %path.display(), error = %e, "cannot read document");
            Vec::new()
        }
    };
    RawDocument {
        id: file_name(&path),
        path,
        format,
        bytes,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ScreenError> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .map_err(|e| ScreenError::InvalidConfig(format!("exclude pattern {pat:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ScreenError::InvalidConfig(e.to_string()))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_excluded(path: &Path, excludes: &GlobSet) -> bool {
    excludes.is_match(path) || path.file_name().map(|n| excludes.is_match(n)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn filters_and_sorts_by_name() {
        let dir = tempdir().unwrap();
        for name in ["zeta.pdf", "alpha.DOCX", "notes.txt", ".hidden.pdf", "mid.pdf"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let docs = load(dir.path(), &[]).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha.DOCX", "mid.pdf", "zeta.pdf"]);
        assert_eq!(docs[0].format, DocFormat::Docx);
        assert_eq!(docs[1].format, DocFormat::Pdf);
        assert_eq!(docs[1].bytes, b"x");
    }

    #[test]
    fn exclude_globs_skip_matches() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.pdf"), b"x").unwrap();
        fs::write(dir.path().join("draft-old.pdf"), b"x").unwrap();
        let docs = load(dir.path(), &["draft-*".to_string()]).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "keep.pdf");
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("absent"), &[]).unwrap_err();
        assert!(matches!(err, ScreenError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn reference_requires_a_pdf() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("jd.docx"), b"x").unwrap();
        let err = find_reference(dir.path(), ReferencePolicy::Strict).unwrap_err();
        assert!(matches!(err, ScreenError::MissingReferenceDocument { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn several_references_follow_policy() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b-role.pdf"), b"b").unwrap();
        fs::write(dir.path().join("a-role.pdf"), b"a").unwrap();

        match find_reference(dir.path(), ReferencePolicy::Strict) {
            Err(ScreenError::AmbiguousReferenceDocument { candidates, .. }) => {
                assert_eq!(candidates, vec!["a-role.pdf", "b-role.pdf"]);
            }
            other => panic!("expected ambiguity error, got {other:?}"),
        }

        let doc = find_reference(dir.path(), ReferencePolicy::FirstSorted).unwrap();
        assert_eq!(doc.id, "a-role.pdf");
        assert_eq!(doc.bytes, b"a");
    }
}
