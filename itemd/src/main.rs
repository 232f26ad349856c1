mod config;
mod telemetry;

use clap::Parser;
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(about = "HTTP API for items kept in a remote document store")]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "itemd.yaml")]
    config: PathBuf,
}

fn load_config(
    path: &std::path::Path,
) -> Result<(Config, Vec<&'static str>), config::ConfigError> {
    let mut config = Config::from_file(path)?;
    let ignored = config.apply_env(|name| std::env::var(name).ok())?;
    Ok((config, ignored))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received, draining connections");
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, ignored_env) = match load_config(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    // Sentry has to be set up before the runtime starts its worker threads.
    let _sentry = telemetry::init_logging(config.logging.as_ref());
    for name in ignored_env {
        tracing::warn!(
            env = name,
            "environment variable is set but has no effect with this config"
        );
    }

    if let Some(metrics) = &config.metrics
        && let Err(e) = telemetry::init_metrics(metrics)
    {
        tracing::error!(error = %e, "could not set up metrics");
        return ExitCode::FAILURE;
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "could not start tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(config = %cli.config.display(), "starting itemd");
    match rt.block_on(item_api::run(config.api, shutdown_signal())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "itemd exited with an error");
            ExitCode::FAILURE
        }
    }
}
