use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lode_config::LodeConfig;
use lode_server::{AppState, router};

/// Lodestar identity and session-replay API server.
#[derive(Debug, Parser)]
#[command(name = "lodestar", version, about)]
struct Cli {
    /// Extra TOML config file, merged over the user and project files.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override `server.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Debug logging.
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only.
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("lodestar error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = LodeConfig::load_with_dotenv(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    config.validate().context("invalid configuration")?;

    let configured = config
        .replay
        .projects
        .keys()
        .filter(|id| config.replay.project(id).is_some())
        .count();
    tracing::info!(
        database = %config.database.path,
        replay_projects = configured,
        self_hosted = config.replay.self_hosted,
        "starting lodestar"
    );

    let state = AppState::from_config(&config).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;
    tracing::info!("listening on {}", config.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LODESTAR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("shutting down");
}
