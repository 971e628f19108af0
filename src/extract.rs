//! Text extraction for CV documents and role descriptions.
//!
//! Three outcomes are kept apart: a missing file and an unreadable file are
//! errors, while a readable document that yields no text is `Ok(None)` (or an
//! empty string for role files). Callers decide whether empty text is fatal.

use std::io;
use std::path::{Path, PathBuf};

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading an input document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The path does not exist.
    #[error("The file at {} was not found", .path.display())]
    NotFound { path: PathBuf },

    /// The path names a directory where a file was expected.
    #[error("{} is a directory, not a file", .path.display())]
    IsADirectory { path: PathBuf },

    /// The process may not read the file.
    #[error("Permission denied reading {}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading the file.
    #[error("Error reading the file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes could not be parsed as a PDF document.
    #[error("Could not parse {} as a PDF: {message}", .path.display())]
    InvalidPdf { path: PathBuf, message: String },

    /// A text file that is not valid UTF-8.
    #[error("{} is not valid UTF-8 text", .path.display())]
    InvalidUtf8 { path: PathBuf },
}

impl ExtractError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::IsADirectory => Self::IsADirectory { path },
            io::ErrorKind::InvalidData => Self::InvalidUtf8 { path },
            _ => Self::Unreadable { path, source },
        }
    }
}

/// Extracts the text of every page of a PDF, in page order.
///
/// Pages that yield non-blank text are joined with a single space. A page whose
/// content cannot be decoded counts as a page without text.
///
/// # Returns
///
/// `Ok(None)` when no page yields any text.
///
/// # Errors
///
/// Returns `ExtractError` if the file is missing, unreadable, or not a PDF.
pub fn extract_pdf_text(path: &Path) -> Result<Option<String>, ExtractError> {
    let bytes = read_bytes(path)?;

    let doc = Document::load_mem(&bytes).map_err(|e| ExtractError::InvalidPdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut texts = Vec::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) if !text.trim().is_empty() => texts.push(text),
            Ok(_) => debug!(page = page_number, "page has no extractable text"),
            Err(e) => debug!(page = page_number, error = %e, "skipping undecodable page"),
        }
    }

    debug!(
        path = %path.display(),
        pages = doc.get_pages().len(),
        pages_with_text = texts.len(),
        "extracted PDF text"
    );

    if texts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(texts.join(" ")))
    }
}

/// Reads a role description file with surrounding whitespace stripped.
///
/// # Errors
///
/// Returns `ExtractError` if the file is missing, unreadable, or not UTF-8.
pub fn read_role_text(path: &Path) -> Result<String, ExtractError> {
    Ok(read_text(path)?.trim().to_string())
}

/// Extracts CV text, choosing the reader from the file extension.
///
/// `.pdf` files (any case) go through [`extract_pdf_text`]; anything else is
/// read as plain text and trimmed.
///
/// # Errors
///
/// Returns `ExtractError` if the file is missing or cannot be read.
pub fn extract_cv_text(path: &Path) -> Result<Option<String>, ExtractError> {
    if is_pdf(path) {
        return extract_pdf_text(path);
    }

    let text = read_text(path)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractError> {
    if path.is_dir() {
        return Err(ExtractError::IsADirectory {
            path: path.to_path_buf(),
        });
    }
    std::fs::read(path).map_err(|e| ExtractError::from_io(path, e))
}

fn read_text(path: &Path) -> Result<String, ExtractError> {
    if path.is_dir() {
        return Err(ExtractError::IsADirectory {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| ExtractError::from_io(path, e))
}
