//! Finding the PDF a converter actually wrote
//!
//! Converters do not always honour the requested output name. The search
//! order is: the requested path, `<source stem>.pdf` next to it,
//! `<source stem>.pdf` next to the source, and finally the most recently
//! modified `*.pdf` in the search directory.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::backend::{parent_or_current, same_stem_pdf};

/// Fixed candidate locations, most specific first, without duplicates
pub fn candidate_paths(requested: &Path, source: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![
        requested.to_path_buf(),
        same_stem_pdf(source, &parent_or_current(requested)),
        source.with_extension("pdf"),
    ];
    let mut seen = Vec::with_capacity(candidates.len());
    candidates.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(c.clone());
            true
        }
    });
    candidates
}

/// Modification time, or the epoch when the filesystem cannot report one
fn modified(path: &Path) -> SystemTime {
    path.metadata()
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Whether `path` is a file written no earlier than `since`
fn is_fresh(path: &Path, since: Option<SystemTime>) -> bool {
    path.is_file() && since.map_or(true, |since| modified(path) >= since)
}

/// Most recently modified `*.pdf` directly inside `dir`
pub fn most_recent_pdf(dir: &Path) -> Option<PathBuf> {
    most_recent_pdf_since(dir, None)
}

/// Most recently modified `*.pdf` inside `dir` written no earlier than `since`
pub fn most_recent_pdf_since(dir: &Path, since: Option<SystemTime>) -> Option<PathBuf> {
    let pattern = format!(
        "{}/*.pdf",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = glob::glob(&pattern).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .filter(|path| is_fresh(path, since))
        .map(|path| (modified(&path), path))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}

/// Locate the converted PDF, or `None` when nothing plausible exists
pub fn locate_pdf(requested: &Path, source: &Path, search_dir: &Path) -> Option<PathBuf> {
    locate_pdf_since(requested, source, search_dir, None)
}

/// Like [`locate_pdf`], ignoring files last modified before `since`.
///
/// Callers pass the time the conversion started so that PDFs left over
/// from earlier runs are never mistaken for fresh output.
pub fn locate_pdf_since(
    requested: &Path,
    source: &Path,
    search_dir: &Path,
    since: Option<SystemTime>,
) -> Option<PathBuf> {
    for candidate in candidate_paths(requested, source) {
        if is_fresh(&candidate, since) {
            debug!(path = %candidate.display(), "found PDF at candidate path");
            return Some(candidate);
        }
    }
    let found = most_recent_pdf_since(search_dir, since);
    if let Some(path) = &found {
        debug!(path = %path.display(), "falling back to most recent PDF");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_order() {
        let candidates = candidate_paths(
            Path::new("/out/converted output.pdf"),
            Path::new("/src/sample document with spaces.docx"),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/out/converted output.pdf"),
                PathBuf::from("/out/sample document with spaces.pdf"),
                PathBuf::from("/src/sample document with spaces.pdf"),
            ]
        );
    }

    #[test]
    fn test_candidates_deduplicated() {
        let candidates = candidate_paths(Path::new("/d/a.pdf"), Path::new("/d/a.docx"));
        assert_eq!(candidates, vec![PathBuf::from("/d/a.pdf")]);
    }

    #[test]
    fn test_locate_prefers_requested_path() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("converted output.pdf");
        let source = dir.path().join("sample document with spaces.docx");
        fs::write(&requested, b"%PDF").unwrap();
        fs::write(dir.path().join("sample document with spaces.pdf"), b"%PDF").unwrap();

        assert_eq!(locate_pdf(&requested, &source, dir.path()), Some(requested));
    }

    #[test]
    fn test_locate_same_stem() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("converted output.pdf");
        let source = dir.path().join("sample document with spaces.docx");
        let same_stem = dir.path().join("sample document with spaces.pdf");
        fs::write(&same_stem, b"%PDF").unwrap();

        assert_eq!(locate_pdf(&requested, &source, dir.path()), Some(same_stem));
    }

    #[test]
    fn test_locate_falls_back_to_any_pdf() {
        // Brackets in the directory name must not be read as a glob class
        let dir = TempDir::with_prefix("pdf [scan] ").unwrap();
        let other = dir.path().join("renamed by tool.pdf");
        fs::write(&other, b"%PDF").unwrap();

        let found = locate_pdf(
            &dir.path().join("converted output.pdf"),
            &dir.path().join("source.docx"),
            dir.path(),
        );
        assert_eq!(found, Some(other));
    }

    #[test]
    fn test_locate_nothing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            locate_pdf(
                &dir.path().join("out.pdf"),
                &dir.path().join("in.docx"),
                dir.path()
            ),
            None
        );
    }

    #[test]
    fn test_locate_since_ignores_older_files() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("converted output.pdf");
        let source = dir.path().join("source.docx");
        fs::write(&requested, b"%PDF").unwrap();
        fs::write(dir.path().join("unrelated.pdf"), b"%PDF").unwrap();

        let later = SystemTime::now() + std::time::Duration::from_secs(3600);
        assert_eq!(
            locate_pdf_since(&requested, &source, dir.path(), Some(later)),
            None
        );
        assert_eq!(
            locate_pdf_since(&requested, &source, dir.path(), Some(SystemTime::UNIX_EPOCH)),
            Some(requested)
        );
    }
}
