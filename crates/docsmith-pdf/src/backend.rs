//! External converter backends
//!
//! Each backend wraps one program that can turn a `.docx` into a PDF. The
//! office suite runs headless and always names its output after the source
//! file; the word-processor bridge accepts an explicit output path.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{PdfError, Result};

/// A program able to convert a word-processing document to PDF
#[async_trait]
pub trait PdfBackend: Send + Sync {
    /// Short name used in messages and logs
    fn name(&self) -> &'static str;

    /// Check if the program is installed
    fn is_available(&self) -> bool;

    /// Convert `source`, aiming for `target`.
    ///
    /// Returns the path the program actually wrote, which may differ from
    /// `target` when the program picks its own file name.
    async fn convert(&self, source: &Path, target: &Path, timeout: Duration) -> Result<PathBuf>;
}

/// LibreOffice / OpenOffice in headless mode
#[derive(Debug, Clone)]
pub struct LibreOffice {
    binaries: Vec<String>,
}

impl LibreOffice {
    /// Executable names tried in order
    pub const DEFAULT_BINARIES: &'static [&'static str] = &["soffice", "libreoffice"];

    pub fn new() -> Self {
        Self::with_binaries(Self::DEFAULT_BINARIES.iter().map(|b| b.to_string()))
    }

    /// Use a custom list of executable names or absolute paths
    pub fn with_binaries(binaries: impl IntoIterator<Item = String>) -> Self {
        Self {
            binaries: binaries.into_iter().collect(),
        }
    }

    /// First configured executable that resolves on PATH
    pub fn locate(&self) -> Option<PathBuf> {
        self.binaries.iter().find_map(|b| which::which(b).ok())
    }
}

impl Default for LibreOffice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PdfBackend for LibreOffice {
    fn name(&self) -> &'static str {
        "LibreOffice"
    }

    fn is_available(&self) -> bool {
        self.locate().is_some()
    }

    async fn convert(&self, source: &Path, target: &Path, timeout: Duration) -> Result<PathBuf> {
        let program = self
            .locate()
            .ok_or_else(|| PdfError::ToolNotFound(self.name().to_string()))?;
        let out_dir = parent_or_current(target);
        // soffice can exit 0 without writing; an old file must not pass as output
        let produced = same_stem_pdf(source, &out_dir);
        remove_stale(&produced)?;

        let output = run(
            self.name(),
            &program,
            [
                OsStr::new("--headless"),
                OsStr::new("--convert-to"),
                OsStr::new("pdf"),
                OsStr::new("--outdir"),
                out_dir.as_os_str(),
                source.as_os_str(),
            ],
            timeout,
        )
        .await?;
        check_status(self.name(), &output)?;

        if produced.exists() {
            Ok(produced)
        } else {
            Err(PdfError::MissingOutput {
                tool: self.name().to_string(),
                expected: produced,
            })
        }
    }
}

/// The `docx2pdf` bridge, which drives Microsoft Word
#[derive(Debug, Clone, Default)]
pub struct Docx2Pdf;

impl Docx2Pdf {
    const BINARY: &'static str = "docx2pdf";
}

#[async_trait]
impl PdfBackend for Docx2Pdf {
    fn name(&self) -> &'static str {
        "docx2pdf"
    }

    fn is_available(&self) -> bool {
        which::which(Self::BINARY).is_ok()
    }

    async fn convert(&self, source: &Path, target: &Path, timeout: Duration) -> Result<PathBuf> {
        let program = which::which(Self::BINARY)
            .map_err(|_| PdfError::ToolNotFound(self.name().to_string()))?;
        // Older releases ignore the output argument's file name
        let fallback = same_stem_pdf(source, &parent_or_current(target));
        remove_stale(target)?;
        remove_stale(&fallback)?;

        let output = run(
            self.name(),
            &program,
            [source.as_os_str(), target.as_os_str()],
            timeout,
        )
        .await?;
        check_status(self.name(), &output)?;

        if target.exists() {
            return Ok(target.to_path_buf());
        }
        if fallback.exists() {
            Ok(fallback)
        } else {
            Err(PdfError::MissingOutput {
                tool: self.name().to_string(),
                expected: target.to_path_buf(),
            })
        }
    }
}

/// `<dir>/<source stem>.pdf`
pub(crate) fn same_stem_pdf(source: &Path, dir: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or_else(|| OsStr::new("document"));
    let mut name = stem.to_os_string();
    name.push(".pdf");
    dir.join(name)
}

/// Delete a PDF left behind by an earlier run
pub(crate) fn remove_stale(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale PDF before conversion");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Directory part of a path; `.` for bare file names
pub(crate) fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

async fn run<I, S>(tool: &str, program: &Path, args: I, timeout: Duration) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    debug!(tool, program = %program.display(), "spawning converter");

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(PdfError::Timeout {
            tool: tool.to_string(),
            after: timeout,
        }),
    }
}

fn check_status(tool: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    };
    Err(PdfError::ToolFailed {
        tool: tool.to_string(),
        message: format!("exit status {}: {}", output.status, detail),
    })
}
