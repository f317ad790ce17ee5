//! File name and permission helpers shared by the tools

use std::path::Path;

/// Append `.docx` unless the name already ends with it (case-insensitive)
pub fn ensure_docx_extension(filename: &str) -> String {
    ensure_extension(filename, "docx")
}

/// Append `.pdf` unless the name already ends with it (case-insensitive)
pub fn ensure_pdf_extension(filename: &str) -> String {
    ensure_extension(filename, "pdf")
}

fn ensure_extension(filename: &str, extension: &str) -> String {
    let has = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));
    if has {
        filename.to_string()
    } else {
        format!("{}.{}", filename, extension)
    }
}

/// Check that `path` can be written: an existing file must not be read-only,
/// and a new file needs an existing, writable directory.
pub fn check_file_writeable(path: &Path) -> Result<(), String> {
    if path.exists() {
        let metadata = path
            .metadata()
            .map_err(|e| format!("Cannot inspect {}: {}", path.display(), e))?;
        if metadata.permissions().readonly() {
            return Err(format!("File {} is read-only", path.display()));
        }
        return Ok(());
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(format!("Directory {} does not exist", dir.display()));
    }
    let readonly = dir
        .metadata()
        .map(|m| m.permissions().readonly())
        .unwrap_or(false);
    if readonly {
        return Err(format!("Directory {} is not writeable", dir.display()));
    }
    Ok(())
}

/// First `max` characters of `text`, with `...` appended when cut
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
