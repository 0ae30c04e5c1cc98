//! sqlgate entry point
//!
//! Parses CLI arguments, initializes logging, boots the database pool,
//! and starts the HTTP server. All subsystem logic lives in the library
//! modules; this file only wires them together and exits non-zero on
//! boot failure.

use std::sync::Arc;

use clap::Parser;

use sqlgate::db::{self, DbConfig};
use sqlgate::http_server::{GatewayState, HttpServer, HttpServerConfig};

#[derive(Parser)]
#[command(name = "sqlgate", about = "JSON-over-HTTP gateway for PostgreSQL CRUD")]
struct Cli {
    /// Host to bind to (overrides the IP environment variable)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides the PORT environment variable)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let db_config = DbConfig::from_env();
    let pool = match db::connect(&db_config).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(err) = db::run_bootstrap_script(&pool).await {
        tracing::error!(error = %err, "failed to run bootstrap script");
        std::process::exit(1);
    }

    let mut http_config = HttpServerConfig::from_env();
    if let Some(host) = cli.host {
        http_config.host = host;
    }
    if let Some(port) = cli.port {
        http_config.port = port;
    }

    let server = HttpServer::with_config(http_config, Arc::new(GatewayState::new(pool)));
    if let Err(err) = server.start().await {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}
