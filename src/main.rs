use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use vital_csv::config::{Cli, ExtractConfig, LoggingConfig};
use vital_csv::pipeline;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(input) = cli.single_input() else {
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::SUCCESS;
    };

    let config = match ExtractConfig::from_cli(&cli, input) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);
    tracing::info!(
        input = %config.input.display(),
        out_dir = %config.out_dir.display(),
        final_batch = ?config.final_batch,
        clock = ?config.clock,
        "Starting vital-csv"
    );

    match run(&config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Extraction aborted");
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &ExtractConfig) -> Result<bool> {
    let report = pipeline::extract(config)
        .await
        .context("Open input file")?;
    for outcome in &report.outcomes {
        if let Err(e) = &outcome.result {
            eprintln!("{} ({}): {}", outcome.kind, outcome.output.display(), e);
        }
    }
    Ok(report.succeeded())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
