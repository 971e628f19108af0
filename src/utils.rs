//! Output directory and report file helpers.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Directory used when none is given on the command line.
pub const DEFAULT_OUTPUT_DIR: &str = "analysis_results";

/// File name of the saved report inside the output directory.
pub const REPORT_FILE_NAME: &str = "analysis_result.json";

/// Errors raised while persisting a report.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The output path exists and is a regular file.
    #[error("{} is a file, not a directory.", .path.display())]
    NotADirectory { path: PathBuf },

    /// The output directory could not be created.
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The report file could not be written.
    #[error("Failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OutputError {
    /// Returns the underlying I/O error, if any.
    pub fn io_source(&self) -> Option<&io::Error> {
        match self {
            Self::NotADirectory { .. } => None,
            Self::CreateDir { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}

/// Ensures the output directory exists.
///
/// Creates the directory structure if it doesn't exist using `create_dir_all`.
///
/// # Errors
///
/// Returns `OutputError::NotADirectory` if `dir` is an existing file, or
/// `OutputError::CreateDir` if creation fails.
pub fn ensure_output_directory(dir: &Path) -> Result<(), OutputError> {
    if dir.is_file() {
        return Err(OutputError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes the report JSON to `{dir}/analysis_result.json`, replacing any
/// previous report.
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns `OutputError` if the directory cannot be prepared or the file
/// cannot be written.
pub fn write_report(dir: &Path, report_json: &str) -> Result<PathBuf, OutputError> {
    ensure_output_directory(dir)?;

    let path = dir.join(REPORT_FILE_NAME);
    std::fs::write(&path, report_json).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
