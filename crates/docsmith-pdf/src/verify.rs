//! Pass / skip / fail classification of a conversion attempt
//!
//! A missing converter is an environment condition, so it skips. A
//! converter that claims success but leaves an empty file fails.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::converter::ConversionOutcome;
use crate::locate::{locate_pdf, locate_pdf_since};

/// Phrases that mark a conversion message as successful (compared lowercase)
pub const SUCCESS_PHRASES: &[&str] = &["successfully converted", "converted to pdf"];

/// Outcome of verifying a conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Verdict {
    /// A non-empty PDF was found
    Pass { pdf: PathBuf, size: u64 },
    /// The environment could not perform the conversion
    Skip { reason: String },
    /// The conversion claimed success but the result is unusable
    Fail { reason: String },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Fail { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass { pdf, size } => {
                write!(f, "PASS: {} ({} bytes)", pdf.display(), size)
            }
            Verdict::Skip { reason } => write!(f, "SKIP: {}", reason),
            Verdict::Fail { reason } => write!(f, "FAIL: {}", reason),
        }
    }
}

/// Slack for filesystems that store modification times coarsely
const MTIME_TOLERANCE: Duration = Duration::from_secs(2);

/// Whether a tool message reports success.
///
/// Only for callers holding nothing but the message; prefer
/// [`assess_outcome`] when the [`ConversionOutcome`] is available.
pub fn reports_success(message: &str) -> bool {
    let lower = message.to_lowercase();
    SUCCESS_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Classify a conversion given its message and the paths involved
pub fn assess(message: &str, requested: &Path, source: &Path, search_dir: &Path) -> Verdict {
    if !reports_success(message) && !requested.exists() {
        return not_available(message);
    }
    match locate_pdf(requested, source, search_dir) {
        Some(pdf) => classify(pdf),
        None => not_found(requested),
    }
}

/// Classify a conversion that started at `started`.
///
/// Success is taken from the outcome itself, never from its message, and
/// only PDFs written after `started` count as its output.
pub fn assess_outcome(
    outcome: &ConversionOutcome,
    requested: &Path,
    source: &Path,
    search_dir: &Path,
    started: SystemTime,
) -> Verdict {
    if !outcome.is_success() {
        return not_available(&outcome.message);
    }

    let since = started.checked_sub(MTIME_TOLERANCE).unwrap_or(started);
    let reported = outcome.output.clone().filter(|p| p.is_file());
    match reported.or_else(|| locate_pdf_since(requested, source, search_dir, Some(since))) {
        Some(pdf) => classify(pdf),
        None => not_found(requested),
    }
}

fn not_available(message: &str) -> Verdict {
    Verdict::Skip {
        reason: format!("PDF conversion not available or failed: {}", message),
    }
}

fn not_found(requested: &Path) -> Verdict {
    Verdict::Skip {
        reason: format!(
            "Conversion reported success but no PDF was found near {}; environment may not allow saving",
            requested.display()
        ),
    }
}

fn classify(pdf: PathBuf) -> Verdict {
    match pdf.metadata() {
        Ok(meta) if meta.len() > 0 => Verdict::Pass {
            size: meta.len(),
            pdf,
        },
        Ok(_) => Verdict::Fail {
            reason: format!("PDF at {} is empty", pdf.display()),
        },
        Err(e) => Verdict::Fail {
            reason: format!("PDF at {} is unreadable: {}", pdf.display(), e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reports_success_ignores_case() {
        assert!(reports_success("Document Successfully Converted"));
        assert!(reports_success("file converted to PDF: out.pdf"));
        assert!(!reports_success("Failed to convert document to PDF"));
        assert!(!reports_success(""));
    }

    #[test]
    fn test_no_success_is_skip() {
        let dir = TempDir::new().unwrap();
        let verdict = assess(
            "LibreOffice is not installed",
            &dir.path().join("out.pdf"),
            &dir.path().join("in.docx"),
            dir.path(),
        );
        assert!(matches!(verdict, Verdict::Skip { .. }));
        assert!(verdict.to_string().contains("not installed"));
    }

    #[test]
    fn test_success_without_file_is_skip() {
        let dir = TempDir::new().unwrap();
        let verdict = assess(
            "Document successfully converted",
            &dir.path().join("out.pdf"),
            &dir.path().join("in.docx"),
            dir.path(),
        );
        assert!(matches!(verdict, Verdict::Skip { .. }));
    }

    #[test]
    fn test_existing_file_without_message_passes() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("out.pdf");
        fs::write(&requested, b"%PDF-1.7").unwrap();

        let verdict = assess("", &requested, &dir.path().join("in.docx"), dir.path());
        assert_eq!(
            verdict,
            Verdict::Pass {
                pdf: requested,
                size: 8
            }
        );
    }

    #[test]
    fn test_empty_file_fails() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("out.pdf");
        fs::write(&requested, b"").unwrap();

        let verdict = assess(
            "converted to PDF",
            &requested,
            &dir.path().join("in.docx"),
            dir.path(),
        );
        assert!(verdict.is_failure());
    }

    #[test]
    fn test_outcome_failure_with_phrase_in_path_is_skip() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("converted to pdf").join("out.pdf");
        let outcome = ConversionOutcome::failed(format!(
            "Failed to convert document to PDF (LibreOffice wrote nothing at {})",
            requested.display()
        ));
        assert!(reports_success(&outcome.message));

        let verdict = assess_outcome(
            &outcome,
            &requested,
            &dir.path().join("in.docx"),
            dir.path(),
            SystemTime::now(),
        );
        assert!(matches!(verdict, Verdict::Skip { .. }));
    }

    #[test]
    fn test_outcome_success_uses_reported_output() {
        let dir = TempDir::new().unwrap();
        let requested = dir.path().join("out.pdf");
        let started = SystemTime::now();
        fs::write(&requested, b"%PDF-1.7").unwrap();

        let outcome = ConversionOutcome {
            message: "done".to_string(),
            output: Some(requested.clone()),
            backend: Some("fake"),
        };
        let verdict = assess_outcome(
            &outcome,
            &requested,
            &dir.path().join("in.docx"),
            dir.path(),
            started,
        );
        assert_eq!(
            verdict,
            Verdict::Pass {
                pdf: requested,
                size: 8
            }
        );
    }
}
