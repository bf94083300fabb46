#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use anyhow::Context;
use args::{Args, Command, TranscribeArgs};
use clap::Parser;
use clipscribe_client::{Outcome, TranscribeClient, UploadForm};
use clipscribe_config::Config;
use clipscribe_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Serve { config, listen } => serve(&config, listen, &args.log_filter).await,
        Command::Transcribe(transcribe_args) => transcribe(transcribe_args, &args.log_filter).await,
    }
}

async fn serve(
    config_path: &std::path::Path,
    listen: Option<std::net::SocketAddr>,
    log_filter: &str,
) -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load(config_path)?;

    // Initialize telemetry
    let _telemetry_guard = clipscribe_telemetry::init(config.telemetry.as_ref(), log_filter)?;

    tracing::info!(
        config_path = %config_path.display(),
        "starting clipscribe"
    );

    // Build server
    let mut server = Server::new(&config)?;
    if let Some(listen) = listen {
        server = server.with_listen_address(listen);
    }

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // Run server
    server.serve(shutdown).await?;

    tracing::info!("clipscribe stopped");
    Ok(())
}

async fn transcribe(args: TranscribeArgs, log_filter: &str) -> anyhow::Result<()> {
    let _telemetry_guard = clipscribe_telemetry::init(None, log_filter)?;

    let mut client = TranscribeClient::new(&args.url)?.with_cookie_name(args.cookie_name);
    if let Some(session) = args.session {
        client = client.with_session(session);
    }

    let mut form = UploadForm::new(client);
    form.select_path(&args.file)
        .await
        .with_context(|| format!("cannot upload {}", args.file.display()))?;
    form.set_model(args.model);
    form.set_language(args.language.unwrap_or_default());
    form.set_prompt(args.prompt.unwrap_or_default());
    form.set_response_format(args.response_format);
    form.set_temperature(args.temperature)?;

    for granularity in args.granularities {
        if !form.granularities().contains(&granularity) && !form.toggle_granularity(granularity) {
            tracing::warn!(%granularity, "timestamp granularities only apply to verbose_json, ignoring");
        }
    }

    form.submit().await?;

    if let Some(rendered) = form.render() {
        println!("{rendered}");
    }

    match form.outcome() {
        Some(Outcome::Error(_)) => anyhow::bail!("transcription failed"),
        _ => Ok(()),
    }
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
