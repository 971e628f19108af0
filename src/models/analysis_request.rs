use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while validating an analysis request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The CV path does not exist.
    #[error("The CV file {} does not exist.", .0.display())]
    MissingCv(PathBuf),

    /// The role description path does not exist.
    #[error("The job description {} does not exist.", .0.display())]
    MissingRole(PathBuf),
}

/// A validated pair of input paths for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    cv: PathBuf,
    role: PathBuf,
}

impl AnalysisRequest {
    /// Validates that both input files exist and builds the request.
    ///
    /// The CV path is checked first.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::MissingCv` or `RequestError::MissingRole` naming the
    /// first path that does not exist.
    pub fn new(cv: impl AsRef<Path>, role: impl AsRef<Path>) -> Result<Self, RequestError> {
        let cv = cv.as_ref();
        let role = role.as_ref();

        if !cv.exists() {
            return Err(RequestError::MissingCv(cv.to_path_buf()));
        }
        if !role.exists() {
            return Err(RequestError::MissingRole(role.to_path_buf()));
        }

        Ok(Self {
            cv: cv.to_path_buf(),
            role: role.to_path_buf(),
        })
    }

    /// Returns the CV path.
    pub fn cv(&self) -> &Path {
        &self.cv
    }

    /// Returns the role description path.
    pub fn role(&self) -> &Path {
        &self.role
    }
}
