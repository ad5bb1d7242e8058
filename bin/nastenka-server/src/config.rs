//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;

use clap::Parser;
use nastenka_core::RenderOptions;

/// Runtime configuration for nastenka-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// SQLite database URL (default: `"sqlite://nastenka.db"`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// When set, log records are also written to daily-rolling files here.
    pub log_dir: Option<PathBuf>,

    /// Comma-separated CORS origins; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_docs: bool,

    /// Header text drawn at the top of the board.
    pub title: String,

    /// Placeholder drawn when there are no messages.
    pub empty_text: String,

    /// strftime pattern for message timestamps (server-local time).
    pub timestamp_format: String,

    /// Regular font face; the embedded face is used when unset.
    pub font_path: Option<PathBuf>,

    /// Bold font face; bold is synthesised when unset.
    pub bold_font_path: Option<PathBuf>,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let render_defaults = RenderOptions::default();
        Self {
            bind_address: env_or("NASTENKA_BIND", "0.0.0.0:3000"),
            database_url: env_or("NASTENKA_DATABASE_URL", "sqlite://nastenka.db"),
            log_level: env_or("NASTENKA_LOG", "info"),
            log_json: parse_bool("NASTENKA_LOG_JSON", false),
            log_dir: env_opt("NASTENKA_LOG_DIR").map(PathBuf::from),
            cors_allowed_origins: env_opt("NASTENKA_CORS_ORIGINS"),
            enable_docs: parse_bool("NASTENKA_ENABLE_DOCS", true),
            title: env_or("NASTENKA_TITLE", &render_defaults.title),
            empty_text: env_or("NASTENKA_EMPTY_TEXT", &render_defaults.empty_text),
            timestamp_format: env_or("NASTENKA_TIMESTAMP_FORMAT", &render_defaults.timestamp_format),
            font_path: env_opt("NASTENKA_FONT").map(PathBuf::from),
            bold_font_path: env_opt("NASTENKA_FONT_BOLD").map(PathBuf::from),
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(bind) = cli.bind {
            self.bind_address = bind;
        }
        if let Some(url) = cli.database_url {
            self.database_url = url;
        }
        self
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title: self.title.clone(),
            empty_text: self.empty_text.clone(),
            timestamp_format: self.timestamp_format.clone(),
        }
    }
}

/// Command-line flags; each one overrides its environment variable.
#[derive(Debug, Default, Parser)]
#[command(name = "nastenka-server", version, about = "Message board that renders posts to a PNG")]
pub struct Cli {
    /// Address to listen on (overrides NASTENKA_BIND).
    #[arg(long)]
    pub bind: Option<String>,

    /// SQLite database URL (overrides NASTENKA_DATABASE_URL).
    #[arg(long)]
    pub database_url: Option<String>,
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
