//! Conversion with ordered fallback across backends

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::backend::{Docx2Pdf, LibreOffice, PdfBackend};
use crate::error::{PdfError, Result};

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Hint appended when every backend failed
const INSTALL_HINT: &str =
    "Install LibreOffice (soffice) or Microsoft Word with docx2pdf to enable PDF conversion.";

/// Result of one conversion request
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Human-readable status, as returned by the tool surface
    pub message: String,
    /// Final PDF location on success
    pub output: Option<PathBuf>,
    /// Backend that produced the PDF
    pub backend: Option<&'static str>,
}

impl ConversionOutcome {
    /// An outcome that produced no PDF
    pub fn failed(message: String) -> Self {
        Self {
            message,
            output: None,
            backend: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.output.is_some()
    }
}

/// Tries each backend in order until one produces a PDF
pub struct Converter {
    backends: Vec<Box<dyn PdfBackend>>,
    timeout: Duration,
}

impl Converter {
    /// A converter with no backends
    pub fn new(timeout: Duration) -> Self {
        Self {
            backends: Vec::new(),
            timeout,
        }
    }

    /// LibreOffice first, then docx2pdf
    pub fn system_default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
            .with_backend(LibreOffice::new())
            .with_backend(Docx2Pdf)
    }

    /// Append a backend to the fallback chain
    pub fn with_backend(mut self, backend: impl PdfBackend + 'static) -> Self {
        self.backends.push(Box::new(backend));
        self
    }

    /// Names of the configured backends, in order
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Convert `source` into `target`.
    ///
    /// Never returns an error: failures are folded into the outcome message
    /// so callers can relay it verbatim.
    pub async fn convert(&self, source: &Path, target: &Path) -> ConversionOutcome {
        if !source.exists() {
            return ConversionOutcome::failed(
                PdfError::SourceNotFound(source.to_path_buf()).to_string(),
            );
        }
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                return ConversionOutcome::failed(format!(
                    "Failed to convert document to PDF: cannot create {}: {}",
                    parent.display(),
                    e
                ));
            }
        }

        let mut attempts = Vec::new();
        for backend in &self.backends {
            if !backend.is_available() {
                attempts.push(PdfError::ToolNotFound(backend.name().to_string()).to_string());
                continue;
            }

            info!(backend = backend.name(), source = %source.display(), "converting to PDF");
            let result = backend.convert(source, target, self.timeout).await;
            match result.and_then(|produced| move_into_place(&produced, target)) {
                Ok(()) => {
                    return ConversionOutcome {
                        message: format!(
                            "Document successfully converted to PDF via {}: {}",
                            backend.name(),
                            target.display()
                        ),
                        output: Some(target.to_path_buf()),
                        backend: Some(backend.name()),
                    };
                }
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "conversion attempt failed");
                    attempts.push(e.to_string());
                }
            }
        }

        let detail = if attempts.is_empty() {
            "no conversion backend configured".to_string()
        } else {
            attempts.join("; ")
        };
        ConversionOutcome::failed(format!(
            "Failed to convert document to PDF ({}). {}",
            detail, INSTALL_HINT
        ))
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("backends", &self.backend_names())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Rename `produced` to `target`, copying when a rename is not possible
fn move_into_place(produced: &Path, target: &Path) -> Result<()> {
    if produced == target {
        return Ok(());
    }
    if fs::rename(produced, target).is_err() {
        fs::copy(produced, target)?;
        fs::remove_file(produced)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Writes a fixed PDF body beside the target under the source's stem
    struct FakeBackend {
        available: bool,
        fail: bool,
    }

    #[async_trait]
    impl PdfBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn convert(&self, source: &Path, target: &Path, _: Duration) -> Result<PathBuf> {
            if self.fail {
                return Err(PdfError::ToolFailed {
                    tool: "fake".to_string(),
                    message: "boom".to_string(),
                });
            }
            let produced = crate::backend::same_stem_pdf(
                source,
                &crate::backend::parent_or_current(target),
            );
            fs::write(&produced, b"%PDF-1.7\n%%EOF\n")?;
            Ok(produced)
        }
    }

    fn source_in(dir: &TempDir) -> PathBuf {
        let source = dir.path().join("sample document with spaces.docx");
        fs::write(&source, b"docx").unwrap();
        source
    }

    #[tokio::test]
    async fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let converter = Converter::new(DEFAULT_TIMEOUT).with_backend(FakeBackend {
            available: true,
            fail: false,
        });
        let outcome = converter
            .convert(&dir.path().join("absent.docx"), &dir.path().join("out.pdf"))
            .await;
        assert!(!outcome.is_success());
        assert!(outcome.message.contains("not found"));
    }

    #[tokio::test]
    async fn test_output_is_renamed_to_target() {
        let dir = TempDir::new().unwrap();
        let source = source_in(&dir);
        let target = dir.path().join("converted output.pdf");

        let converter = Converter::new(DEFAULT_TIMEOUT).with_backend(FakeBackend {
            available: true,
            fail: false,
        });
        let outcome = converter.convert(&source, &target).await;

        assert_eq!(outcome.output.as_deref(), Some(target.as_path()));
        assert_eq!(outcome.backend, Some("fake"));
        assert!(outcome.message.contains("successfully converted"));
        assert!(target.exists());
        assert!(!dir.path().join("sample document with spaces.pdf").exists());
    }

    #[tokio::test]
    async fn test_falls_back_after_failure() {
        let dir = TempDir::new().unwrap();
        let source = source_in(&dir);
        let target = dir.path().join("out.pdf");

        let converter = Converter::new(DEFAULT_TIMEOUT)
            .with_backend(FakeBackend {
                available: false,
                fail: false,
            })
            .with_backend(FakeBackend {
                available: true,
                fail: true,
            })
            .with_backend(FakeBackend {
                available: true,
                fail: false,
            });
        let outcome = converter.convert(&source, &target).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_all_backends_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = source_in(&dir);

        let converter = Converter::new(DEFAULT_TIMEOUT).with_backend(FakeBackend {
            available: false,
            fail: false,
        });
        let outcome = converter.convert(&source, &dir.path().join("out.pdf")).await;

        assert!(!outcome.is_success());
        assert!(outcome.message.contains("fake is not installed"));
        assert!(outcome.message.contains("Install LibreOffice"));
        assert!(!crate::verify::reports_success(&outcome.message));
    }

    #[test]
    fn test_system_default_order() {
        assert_eq!(
            Converter::system_default().backend_names(),
            vec!["LibreOffice", "docx2pdf"]
        );
    }
}
