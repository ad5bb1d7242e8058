//! nastenka-server – entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables and CLI flags.
//! 2. Initialise structured tracing (JSON or pretty, optional log files).
//! 3. Open the SQLite database and run pending migrations.
//! 4. Load fonts and build the board renderer.
//! 5. Build the Axum router and start the HTTP server with graceful shutdown.

mod config;
mod error;
mod middleware;
mod routes;
mod schemas;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nastenka_core::{BoardRenderer, FontSet, MessageBoard, SqliteStore};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::{Cli, Config};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env().with_cli(Cli::parse());

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    // Held until exit so buffered file output is flushed.
    let _log_guard = init_tracing(&cfg);

    info!(version = env!("CARGO_PKG_VERSION"), "nastenka-server starting");

    // ── 3. Database ────────────────────────────────────────────────────────────
    let store = SqliteStore::connect(&cfg.database_url)
        .await
        .with_context(|| format!("failed to open database {}", cfg.database_url))?;
    info!(database_url = %cfg.database_url, "database ready");

    // ── 4. Renderer ────────────────────────────────────────────────────────────
    let fonts = FontSet::load(cfg.font_path.as_deref(), cfg.bold_font_path.as_deref())
        .context("failed to load board fonts")?;
    info!(synthetic_bold = fonts.synthetic_bold(), "fonts loaded");
    let renderer = BoardRenderer::new(fonts, cfg.render_options())?;

    // ── 5. Shared application state ────────────────────────────────────────────
    let state = Arc::new(AppState {
        board: MessageBoard::new(Arc::new(store), Arc::new(renderer)),
        config: Arc::new(cfg.clone()),
    });

    // ── 6. HTTP server with graceful shutdown ──────────────────────────────────
    let app = routes::build(Arc::clone(&state));
    let addr: SocketAddr = cfg
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address {}", cfg.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.board.store().close().await;
    info!("nastenka-server stopped");
    Ok(())
}

/// Install the global subscriber. Returns the file writer's guard when
/// `NASTENKA_LOG_DIR` is set.
fn init_tracing(cfg: &Config) -> Option<WorkerGuard> {
    // Resolve the filter directives once, warning loudly if the configured
    // value is not a valid tracing filter expression.
    let directives = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(v) if v.parse::<EnvFilter>().is_ok() => v,
        _ => match cfg.log_level.parse::<EnvFilter>() {
            Ok(_) => cfg.log_level.clone(),
            Err(e) => {
                eprintln!(
                    "WARN: NASTENKA_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                "info".to_owned()
            }
        },
    };
    let env_filter = || EnvFilter::new(&directives);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if cfg.log_json {
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(env_filter())
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(env_filter())
                .boxed(),
        );
    }

    let guard = cfg.log_dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "nastenka-server.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(env_filter())
                .boxed(),
        );
        guard
    });

    tracing_subscriber::registry().with(layers).init();
    guard
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c    => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
