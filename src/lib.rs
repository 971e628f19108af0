pub mod analyzer;
pub mod cli;
pub mod config;
pub mod extract;
pub mod gemini;
pub mod models;
pub mod prompt;
pub mod report;
pub mod service;
pub mod utils;

pub use analyzer::{MatchAnalyzer, MatchAnalyzerBuilder};
pub use config::{Config, ConfigError};
pub use models::{AnalysisRequest, AnalysisResult, RawAnalysis, SkillGap};
pub use service::{
    AnalysisInputs, AnalysisService, ErrorCategory, RunOptions, RunOutcome, ServiceError, Verbosity,
};
