//! Document emitters for PaperForge.
//!
//! The paper body never carries a references section; each format appends
//! the consolidated list in its own way. Output files are named
//! `<prefix>_<YYYYMMDD_HHMMSS>.<ext>`.

pub mod classify;
pub mod docx;
pub mod markdown;
pub mod txt;

pub use classify::{LineKind, classify_line};

use chrono::NaiveDateTime;
use paperforge_core::error::RenderError;
use paperforge_core::paper::{OutputFormat, PaperReport, Reference};
use std::path::{Path, PathBuf};
use tracing::info;

/// Render `body` and `references` to the bytes of a `format` document.
pub fn render(
    format: OutputFormat,
    body: &str,
    references: &[Reference],
) -> Result<Vec<u8>, RenderError> {
    match format {
        OutputFormat::Txt => Ok(txt::render(body, references).into_bytes()),
        OutputFormat::Markdown => Ok(markdown::render(body, references).into_bytes()),
        OutputFormat::Docx => docx::render(body, references),
    }
}

pub fn output_file_name(prefix: &str, format: OutputFormat, now: NaiveDateTime) -> String {
    format!(
        "{prefix}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Render and write the document into `dir`, creating it if needed.
/// Returns the path written.
pub fn write_document(
    dir: &Path,
    prefix: &str,
    format: OutputFormat,
    body: &str,
    references: &[Reference],
    now: NaiveDateTime,
) -> Result<PathBuf, RenderError> {
    let bytes = render(format, body, references)?;

    std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(output_file_name(prefix, format, now));
    std::fs::write(&path, &bytes).map_err(|source| RenderError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), bytes = bytes.len(), "Document written");
    Ok(path)
}

/// Write a finished pipeline report.
pub fn write_report(
    dir: &Path,
    prefix: &str,
    report: &PaperReport,
    now: NaiveDateTime,
) -> Result<PathBuf, RenderError> {
    write_document(
        dir,
        prefix,
        report.format,
        &report.draft,
        &report.references,
        now,
    )
}
