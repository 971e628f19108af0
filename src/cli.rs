//! Command-line arguments.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use crate::service::{AnalysisService, RunOptions, ServiceError, Verbosity, load_inputs};
use crate::utils::DEFAULT_OUTPUT_DIR;

/// cvmatch - score how well a CV fits a job description
#[derive(Debug, Parser)]
#[command(name = "cvmatch")]
#[command(about = "Analyze how well a CV matches a job description using Gemini")]
#[command(version)]
pub struct Cli {
    /// Path to the CV (PDF, or plain text for any other extension)
    #[arg(long, value_name = "PATH")]
    pub cv: PathBuf,

    /// Path to the job description text file
    #[arg(long, value_name = "PATH")]
    pub role: PathBuf,

    /// Directory the report is saved into
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Do not save the report to disk
    #[arg(long)]
    pub no_save: bool,

    /// Output verbosity: 0 = silent, 1 = summary, 2 = full report
    #[arg(
        long,
        value_name = "LEVEL",
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    pub verbose: u8,

    /// Gemini model to use (overrides GEMINI_MODEL)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Ask the API for a JSON-only reply
    #[arg(long)]
    pub json_mode: bool,
}

impl Cli {
    /// Converts the parsed flags into options for a service run.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            output_dir: (!self.no_save).then(|| self.output_dir.clone()),
            verbosity: Verbosity::try_from(self.verbose).unwrap_or_default(),
        }
    }
}

/// Process exit status for a successful analysis.
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit status for every recognized failure.
pub const EXIT_FAILURE: i32 = 1;

/// Runs one analysis for the parsed arguments and returns the exit status.
///
/// Normal output goes to `out`; failures are reported on `err_out`.
pub fn execute<W: Write, E: Write>(
    service: &AnalysisService,
    cli: &Cli,
    out: &mut W,
    err_out: &mut E,
) -> i32 {
    match service.run(&cli.cv, &cli.role, &cli.run_options(), out) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report_error(&e, err_out),
    }
}

/// Like [`execute`], but builds the service only after both inputs loaded.
///
/// Missing or empty input files are therefore reported even when the
/// service itself cannot be configured.
pub fn execute_with<W, E, F>(cli: &Cli, connect: F, out: &mut W, err_out: &mut E) -> i32
where
    W: Write,
    E: Write,
    F: FnOnce(&Cli) -> Result<AnalysisService, ServiceError>,
{
    let result = load_inputs(&cli.cv, &cli.role).and_then(|inputs| {
        let service = connect(cli)?;
        service.run_inputs(&inputs, &cli.run_options(), out)
    });

    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report_error(&e, err_out),
    }
}

/// Prints an error and its category hint, returning [`EXIT_FAILURE`].
pub fn report_error<E: Write>(error: &ServiceError, err_out: &mut E) -> i32 {
    tracing::debug!(error = ?error, "analysis failed");
    // stderr is best effort
    let _ = writeln!(err_out, "Error: {error}");
    let _ = writeln!(err_out, "{}", error.category().explanation());
    EXIT_FAILURE
}
