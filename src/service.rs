use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::analyzer::MatchAnalyzer;
use crate::config::ConfigError;
use crate::extract::{ExtractError, extract_cv_text, read_role_text};
use crate::gemini::GeminiError;
use crate::models::{AnalysisRequest, AnalysisResult, RequestError};
use crate::report;
use crate::utils::{OutputError, write_report};

/// How much the CLI prints to standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Nothing on stdout.
    Silent,
    /// A one-line confirmation.
    #[default]
    Summary,
    /// The full JSON report.
    Full,
}

impl TryFrom<u8> for Verbosity {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Silent),
            1 => Ok(Self::Summary),
            2 => Ok(Self::Full),
            other => Err(other),
        }
    }
}

/// Per-invocation options for [`AnalysisService::run`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory to save `analysis_result.json` into; `None` skips saving.
    pub output_dir: Option<PathBuf>,
    pub verbosity: Verbosity,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub result: AnalysisResult,
    pub report_json: String,
    pub saved_to: Option<PathBuf>,
}

/// Broad failure classes, each with a fixed explanation for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    IsADirectory,
    PermissionDenied,
    MalformedJson,
    InvalidInput,
    Configuration,
    RemoteService,
    Os,
    Unexpected,
}

impl ErrorCategory {
    /// Returns the hint printed after the error message.
    pub fn explanation(self) -> &'static str {
        match self {
            Self::NotFound => "The specified file was not found.",
            Self::IsADirectory => "A directory was provided where a file was expected.",
            Self::PermissionDenied => {
                "You do not have permission to read the input or write to the output directory."
            }
            Self::MalformedJson => "Failed to encode the JSON report.",
            Self::InvalidInput => "The provided input files may not be in the expected format.",
            Self::Configuration => {
                "Please ensure your GEMINI_API_KEY is correctly set in your environment."
            }
            Self::RemoteService => {
                "The model did not return a usable analysis. Please check your network or API configuration and retry."
            }
            Self::Os => {
                "There was an operating system error while reading inputs or writing the report."
            }
            Self::Unexpected => "Analysis failed.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.explanation())
    }
}

/// Errors surfaced to the CLI by an analysis run.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Extraction succeeded but produced no text.
    #[error("The {input} is empty or contains no extractable text")]
    EmptyInput { input: &'static str },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The remote client could not be constructed.
    #[error("Failed to set up the Gemini client: {0}")]
    Client(#[from] GeminiError),

    /// Neither the first call nor the retry produced a JSON object.
    #[error("No usable analysis was returned by the model")]
    NoAnalysis,

    #[error("Failed to encode the JSON report: {0}")]
    Report(#[from] serde_json::Error),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Failed to write to standard output: {0}")]
    Stdout(#[source] io::Error),
}

impl ServiceError {
    /// Classifies the error for the user-facing explanation.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Request(_) => ErrorCategory::NotFound,
            Self::Extract(e) => match e {
                ExtractError::NotFound { .. } => ErrorCategory::NotFound,
                ExtractError::IsADirectory { .. } => ErrorCategory::IsADirectory,
                ExtractError::PermissionDenied { .. } => ErrorCategory::PermissionDenied,
                ExtractError::Unreadable { .. } => ErrorCategory::Os,
                ExtractError::InvalidPdf { .. } | ExtractError::InvalidUtf8 { .. } => {
                    ErrorCategory::InvalidInput
                }
            },
            Self::EmptyInput { .. } => ErrorCategory::InvalidInput,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Client(GeminiError::MissingApiKey | GeminiError::InvalidUrl(_)) => {
                ErrorCategory::Configuration
            }
            Self::Client(_) | Self::NoAnalysis => ErrorCategory::RemoteService,
            Self::Report(_) => ErrorCategory::MalformedJson,
            Self::Output(e) => match e.io_source().map(io::Error::kind) {
                Some(io::ErrorKind::PermissionDenied) => ErrorCategory::PermissionDenied,
                _ => ErrorCategory::Os,
            },
            Self::Stdout(_) => ErrorCategory::Os,
        }
    }
}

/// Runs the extraction → analysis → report pipeline for the CLI.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use cvmatch::analyzer::MatchAnalyzer;
/// use cvmatch::gemini::GeminiClientBuilder;
/// use cvmatch::service::{AnalysisService, RunOptions};
///
/// # fn main() -> anyhow::Result<()> {
/// let client = GeminiClientBuilder::new().api_key("key").build()?;
/// let service = AnalysisService::new(MatchAnalyzer::new(Arc::new(client)));
///
/// let outcome = service.run(
///     Path::new("cv.pdf"),
///     Path::new("role.txt"),
///     &RunOptions::default(),
///     &mut std::io::stdout(),
/// )?;
/// println!("score: {}", outcome.result.match_score());
/// # Ok(())
/// # }
/// ```
pub struct AnalysisService {
    analyzer: MatchAnalyzer,
}

impl AnalysisService {
    /// Creates a new service around the given analyzer.
    pub fn new(analyzer: MatchAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Analyzes already-extracted texts and normalizes the reply.
    ///
    /// Returns `None` if the model produced no usable JSON object.
    pub fn analyze_texts(&self, cv_text: &str, role_text: &str) -> Option<AnalysisResult> {
        self.analyzer
            .analyze_match(cv_text, role_text)
            .map(|raw| report::normalize(Some(&raw)))
    }

    /// Runs a full analysis for the given input files.
    ///
    /// Messages for the user go to `out`. Nothing is written to the output
    /// directory unless the analysis succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if an input is missing, unreadable or empty, if
    /// the model gives no usable answer, or if the report cannot be saved.
    pub fn run<W: Write>(
        &self,
        cv_path: &Path,
        role_path: &Path,
        options: &RunOptions,
        out: &mut W,
    ) -> Result<RunOutcome, ServiceError> {
        let inputs = load_inputs(cv_path, role_path)?;
        self.run_inputs(&inputs, options, out)
    }

    /// Analyzes already-loaded inputs, then saves and prints the report.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NoAnalysis` if the model gives no usable answer,
    /// or an output error if the report cannot be saved or printed.
    pub fn run_inputs<W: Write>(
        &self,
        inputs: &AnalysisInputs,
        options: &RunOptions,
        out: &mut W,
    ) -> Result<RunOutcome, ServiceError> {
        let result = self
            .analyze_texts(&inputs.cv_text, &inputs.role_text)
            .ok_or(ServiceError::NoAnalysis)?;
        let report_json = report::to_json(&result)?;

        let saved_to = match &options.output_dir {
            Some(dir) => {
                let path = write_report(dir, &report_json)?;
                info!(path = %path.display(), "report saved");
                if options.verbosity != Verbosity::Silent {
                    writeln!(out, "Analysis saved to {}", path.display())
                        .map_err(ServiceError::Stdout)?;
                }
                Some(path)
            }
            None => None,
        };

        match options.verbosity {
            Verbosity::Silent => {}
            Verbosity::Summary => {
                writeln!(out, "Analysis completed successfully!").map_err(ServiceError::Stdout)?
            }
            Verbosity::Full => writeln!(out, "{report_json}").map_err(ServiceError::Stdout)?,
        }

        Ok(RunOutcome {
            result,
            report_json,
            saved_to,
        })
    }
}

/// Extracted CV and role texts, both non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInputs {
    cv_text: String,
    role_text: String,
}

impl AnalysisInputs {
    /// Returns the extracted CV text.
    pub fn cv_text(&self) -> &str {
        &self.cv_text
    }

    /// Returns the role description text.
    pub fn role_text(&self) -> &str {
        &self.role_text
    }
}

/// Validates both paths and extracts their texts.
///
/// Needs no model client, so input errors surface before any configuration
/// is resolved.
///
/// # Errors
///
/// Returns `ServiceError` if a path is missing, a file cannot be read, or an
/// extracted text is empty.
pub fn load_inputs(cv_path: &Path, role_path: &Path) -> Result<AnalysisInputs, ServiceError> {
    let request = AnalysisRequest::new(cv_path, role_path)?;

    let role_text = read_role_text(request.role())?;
    if role_text.is_empty() {
        return Err(ServiceError::EmptyInput {
            input: "role description",
        });
    }

    let cv_text = extract_cv_text(request.cv())?
        .ok_or(ServiceError::EmptyInput { input: "CV" })?;

    debug!(
        cv_chars = cv_text.len(),
        role_chars = role_text.len(),
        "inputs extracted"
    );

    Ok(AnalysisInputs { cv_text, role_text })
}
