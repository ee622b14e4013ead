use std::process::ExitCode;

use clap::Parser as _;
use cli::Cli;
use color_eyre::eyre::{self, Context as _};
use matcha_core::{
    config::Config,
    telemetry::{self, init_subscriber},
};
use tokio::{
    select,
    signal::unix::{SignalKind, signal},
    task::JoinError,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, level_filters::LevelFilter};

mod cli;
mod consolidate;
mod lookup;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let tracing_subscriber = telemetry::get_subscriber(LevelFilter::INFO);
    if let Err(err) = init_subscriber(tracing_subscriber) {
        eprintln!("Failed to set up logging: {err:#}");
        return ExitCode::FAILURE;
    }
    debug!(?config, "loaded configuration");

    let shutdown_token = CancellationToken::new();

    let mut command_jh = tokio::spawn(cli.run(config, shutdown_token.clone()));

    // Set up signal handlers for graceful shutdown
    let mut sigterm = signal(SignalKind::terminate())
        .expect("setting sigterm listener on unix should always work");
    let mut sigint = signal(SignalKind::interrupt())
        .expect("setting sigint listener on unix should always work");

    // Wait for either command completion or interrupt signal
    let finished = select! {
        res = &mut command_jh => Some(flatten_join_result(res)),
        _ = sigterm.recv() => {
            info!("received SIGTERM signal");
            None
        }
        _ = sigint.recv() => {
            info!("received SIGINT signal");
            None
        }
    };

    // an interrupted command stops between symbols and never writes its output
    let result = match finished {
        Some(result) => result,
        None => {
            shutdown_token.cancel();
            flatten_join_result(command_jh.await)
        }
    };

    match result {
        Ok(()) => {
            debug!("command completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let error = format!("{e:#}");
            error!(%error, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn flatten_join_result<T>(res: Result<eyre::Result<T>, JoinError>) -> eyre::Result<T> {
    match res {
        Ok(Ok(res)) => Ok(res),
        Ok(Err(e)) => Err(e),
        Err(e) => Err(e).wrap_err("command task panicked"),
    }
}
