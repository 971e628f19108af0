use std::io;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cvmatch::cli::{self, Cli};
use cvmatch::gemini::GeminiClientBuilder;
use cvmatch::{AnalysisService, Config, MatchAnalyzerBuilder, ServiceError};

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let code = cli::execute_with(&cli, build_service, &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}

/// Sends diagnostics to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Resolves configuration and wires the client, analyzer, and service.
///
/// Called once the inputs have loaded, so a missing API key never hides an
/// input error.
fn build_service(cli: &Cli) -> Result<AnalysisService, ServiceError> {
    let mut config = Config::from_env()?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }

    let client = GeminiClientBuilder::new()
        .api_key(config.api_key)
        .base_url(config.base_url)
        .model(config.model)
        .json_mode(cli.json_mode)
        .build()?;
    tracing::debug!(
        endpoint = %client.endpoint(),
        json_mode = client.json_mode(),
        "Gemini client ready"
    );

    let analyzer = MatchAnalyzerBuilder::new().client(Arc::new(client)).build();
    Ok(AnalysisService::new(analyzer))
}
