use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use guttersnap_server::{
    AppState,
    infra::config::{Config, ConfigLoad, ConfigLoader},
    relay::{HttpMailRelay, LogMailRelay, MailRelay},
    routes,
    uploads::UploadStore,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "guttersnap-server")]
#[command(about = "Receives GutterSnap photo requests and relays them by mail")]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Path to a guttersnap.toml configuration file
    #[arg(short, long, env = "GUTTERSNAP_CONFIG")]
    config: Option<PathBuf>,

    /// Dotenv file to read instead of ./.env
    #[arg(long, env = "GUTTERSNAP_ENV_FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &args.env_file {
        loader = loader.with_env_file(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded dotenv file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    run_server(config).await
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr = config
        .server
        .bind_addr()
        .context("invalid server host/port")?;

    let uploads =
        UploadStore::open(&config.uploads.dir, config.uploads.cleanup_delay)
            .await
            .with_context(|| {
                format!(
                    "failed to create upload directory {}",
                    config.uploads.dir.display()
                )
            })?;

    let relay: Arc<dyn MailRelay> = match &config.mail.relay_url {
        Some(url) => Arc::new(
            HttpMailRelay::new(
                url.clone(),
                config.mail.user.clone(),
                config.mail.pass.clone(),
            )
            .context("failed to build mail relay client")?,
        ),
        None => Arc::new(LogMailRelay),
    };

    info!(
        static_dir = %config.static_dir.display(),
        upload_dir = %config.uploads.dir.display(),
        cleanup_delay = ?config.uploads.cleanup_delay,
        relay = relay.name(),
        recipient = %config.mail.recipient,
        "starting GutterSnap server"
    );

    let state = AppState::new(config, relay, uploads);
    let router = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "GutterSnap server running on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
