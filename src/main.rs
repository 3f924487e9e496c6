use std::path::PathBuf;
use std::process::ExitCode;

mod app;
mod config;
mod db;
mod error;
mod highlights;
mod models;
mod services;

use app::App;
use config::{Backend, Config};
use error::{AppError, Result};

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config_path: Option<PathBuf>,
    date: Option<String>,
    local: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| AppError::Config("--config requires a path".to_string()))?;
                cli.config_path = Some(PathBuf::from(path));
            }
            "--date" => {
                let date = iter
                    .next()
                    .ok_or_else(|| AppError::Config("--date requires YYYY-MM-DD".to_string()))?;
                cli.date = Some(date.clone());
            }
            "--local" => cli.local = true,
            other => return Err(AppError::Config(format!("unknown argument '{}'", other))),
        }
    }

    Ok(cli)
}

async fn run() -> Result<bool> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;

    // File first, then environment, then command line
    let mut config = Config::load(cli.config_path.as_deref())?;
    config.apply_env()?;
    if let Some(date) = cli.date {
        config.date = Some(date);
    }
    if cli.local {
        config.backend = Backend::Local;
    }

    let app = App::new(&config).await?;
    let report = app.run().await;

    if report.is_success() {
        tracing::info!("Run finished: {}", report);
    } else {
        tracing::error!("Run finished with failures: {}", report);
    }
    Ok(report.is_success())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
