use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spacetraveling::config::Config;
use spacetraveling::content::{ContentApi, PrismicClient};
use spacetraveling::{generate, web};

const USAGE: &str = "usage: spacetraveling [serve|build]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Serve,
    Build,
}

fn parse_command(arg: Option<&str>) -> Result<Command> {
    match arg {
        None | Some("serve") => Ok(Command::Serve),
        Some("build") => Ok(Command::Build),
        Some(other) => bail!("unknown command '{other}'\n{USAGE}"),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let arg = std::env::args().nth(1);
    let command = parse_command(arg.as_deref())?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        endpoint = %config.api_endpoint,
        document_type = %config.document_type,
        page_size = config.page_size,
        "Configuration loaded"
    );

    let api: Arc<dyn ContentApi> = Arc::new(
        PrismicClient::new(&config).context("Failed to initialize content API client")?,
    );

    match command {
        Command::Build => {
            let report = generate::build_site(&config, api.as_ref()).await?;
            info!(
                pages = report.pages.len(),
                skipped = report.skipped.len(),
                output_dir = %config.output_dir.display(),
                "Build finished"
            );
        }
        Command::Serve => {
            let shutdown = CancellationToken::new();
            let signal = shutdown.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                info!("Shutdown signal received");
                signal.cancel();
            });

            web::serve(config, api, shutdown).await?;
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,spacetraveling=debug"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
