use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use clap::Parser;
use cvmatch::cli::{self, Cli, EXIT_FAILURE, EXIT_SUCCESS};
use cvmatch::gemini::{GeminiClientTrait, GeminiError};
use cvmatch::prompt::Prompt;
use cvmatch::{AnalysisService, ConfigError, MatchAnalyzerBuilder, ServiceError};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Stand-in for the Gemini API that counts how often it is called.
struct FakeGemini {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl FakeGemini {
    fn new(reply: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.map(String::from),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeminiClientTrait for FakeGemini {
    fn generate(&self, _prompt: &Prompt) -> Result<String, GeminiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(GeminiError::Api {
                status: 429,
                message: "RESOURCE_EXHAUSTED: quota exceeded".to_string(),
            }),
        }
    }
}

fn service(client: Arc<FakeGemini>) -> AnalysisService {
    AnalysisService::new(MatchAnalyzerBuilder::new().client(client).build())
}

fn write_inputs(dir: &Path) -> Result<()> {
    std::fs::write(dir.join("cv.txt"), "Mock CV Text")?;
    std::fs::write(dir.join("role.txt"), "Mock Role Text")?;
    Ok(())
}

fn parse(dir: &Path, extra: &[&str]) -> Cli {
    let cv = dir.join("cv.txt");
    let role = dir.join("role.txt");
    let out = dir.join("analysis_results");
    let mut args = vec![
        "cvmatch".to_string(),
        "--cv".to_string(),
        cv.display().to_string(),
        "--role".to_string(),
        role.display().to_string(),
        "--output-dir".to_string(),
        out.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::parse_from(args)
}

#[test]
fn successful_run_exits_zero_and_saves_exact_report() -> Result<()> {
    let tmp = TempDir::new()?;
    write_inputs(tmp.path())?;
    let client = FakeGemini::new(Some(
        r#"{"match_score": 85, "skill_gaps": [{"category": "Tech", "gap": "Java"}], "recommendations": ["Learn Java"]}"#,
    ));
    let cli = parse(tmp.path(), &[]);
    let mut out = Vec::new();
    let mut err = Vec::new();

    let code = cli::execute(&service(client.clone()), &cli, &mut out, &mut err);

    assert_eq!(code, EXIT_SUCCESS);
    let saved = tmp.path().join("analysis_results").join("analysis_result.json");
    let report: Value = serde_json::from_str(&std::fs::read_to_string(saved)?)?;
    assert_eq!(
        report,
        json!({
            "match_score": 85,
            "skill_gaps": [{"category": "Tech", "gap": "Java"}],
            "recommendations": ["Learn Java"]
        })
    );
    assert_eq!(client.calls(), 1);
    assert!(err.is_empty());
    Ok(())
}

#[test]
fn remote_failure_exits_one_without_output_file() -> Result<()> {
    let tmp = TempDir::new()?;
    write_inputs(tmp.path())?;
    let client = FakeGemini::new(None);
    let cli = parse(tmp.path(), &[]);
    let mut out = Vec::new();
    let mut err = Vec::new();

    let code = cli::execute(&service(client.clone()), &cli, &mut out, &mut err);

    assert_eq!(code, EXIT_FAILURE);
    assert!(!tmp.path().join("analysis_results").join("analysis_result.json").exists());
    assert!(String::from_utf8(err)?.starts_with("Error: "));
    assert_eq!(client.calls(), 2);
    Ok(())
}

#[test]
fn missing_cv_exits_one_naming_the_path() -> Result<()> {
    let tmp = TempDir::new()?;
    std::fs::write(tmp.path().join("role.txt"), "Mock Role Text")?;
    let client = FakeGemini::new(Some("{}"));
    let cli = parse(tmp.path(), &[]);
    let mut err = Vec::new();

    let code = cli::execute(&service(client.clone()), &cli, &mut Vec::new(), &mut err);

    assert_eq!(code, EXIT_FAILURE);
    let message = String::from_utf8(err)?;
    assert!(message.contains("cv.txt"));
    assert!(message.contains("does not exist"));
    assert_eq!(client.calls(), 0);
    Ok(())
}

#[test]
fn full_verbosity_without_saving_prints_report_only() -> Result<()> {
    let tmp = TempDir::new()?;
    write_inputs(tmp.path())?;
    let client = FakeGemini::new(Some(
        "Here is my analysis:\n```json\n{\"match_score\": 30, \"skill_gaps\": [], \"recommendations\": []}\n```",
    ));
    let cli = parse(tmp.path(), &["--no-save", "--verbose", "2"]);
    let mut out = Vec::new();

    let code = cli::execute(&service(client), &cli, &mut out, &mut Vec::new());

    assert_eq!(code, EXIT_SUCCESS);
    assert!(!tmp.path().join("analysis_results").exists());
    let printed: Value = serde_json::from_str(&String::from_utf8(out)?)?;
    assert_eq!(
        printed,
        json!({"match_score": 30, "skill_gaps": [], "recommendations": []})
    );
    Ok(())
}

#[test]
fn missing_cv_is_reported_before_configuration() -> Result<()> {
    let tmp = TempDir::new()?;
    std::fs::write(tmp.path().join("role.txt"), "Mock Role Text")?;
    let cli = parse(tmp.path(), &[]);
    let mut connected = false;
    let mut err = Vec::new();

    let code = cli::execute_with(
        &cli,
        |_| {
            connected = true;
            Err(ServiceError::from(ConfigError::MissingApiKey))
        },
        &mut Vec::new(),
        &mut err,
    );

    assert_eq!(code, EXIT_FAILURE);
    let message = String::from_utf8(err)?;
    assert!(message.contains("cv.txt"), "got: {message}");
    assert!(!message.contains("GEMINI_API_KEY"), "got: {message}");
    assert!(!connected);
    Ok(())
}

#[test]
fn missing_api_key_is_reported_after_inputs_load() -> Result<()> {
    let tmp = TempDir::new()?;
    write_inputs(tmp.path())?;
    let cli = parse(tmp.path(), &[]);
    let mut err = Vec::new();

    let code = cli::execute_with(
        &cli,
        |_| Err(ConfigError::MissingApiKey.into()),
        &mut Vec::new(),
        &mut err,
    );

    assert_eq!(code, EXIT_FAILURE);
    let message = String::from_utf8(err)?;
    assert!(message.starts_with("Error: GEMINI_API_KEY"));
    assert!(message.contains("Please ensure your GEMINI_API_KEY is correctly set"));
    assert!(!tmp.path().join("analysis_results").exists());
    Ok(())
}

#[test]
fn connected_service_runs_the_analysis() -> Result<()> {
    let tmp = TempDir::new()?;
    write_inputs(tmp.path())?;
    let client = FakeGemini::new(Some(
        r#"{"match_score": 70, "skill_gaps": [], "recommendations": []}"#,
    ));
    let cli = parse(tmp.path(), &["--verbose", "0"]);
    let mut out = Vec::new();

    let code = cli::execute_with(
        &cli,
        |_| Ok(service(client.clone())),
        &mut out,
        &mut Vec::new(),
    );

    assert_eq!(code, EXIT_SUCCESS);
    assert!(out.is_empty());
    assert!(tmp.path().join("analysis_results").join("analysis_result.json").exists());
    assert_eq!(client.calls(), 1);
    Ok(())
}
