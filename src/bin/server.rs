// Dice Messages - Main GraphQL Server
// Run with: cargo run --bin server

//! # Dice Messages Server Binary
//!
//! Starts the HTTP server exposing the GraphQL API.
//!
//! - **GraphQL API**: `POST /graphql` (and `GET /graphql?query=...`)
//! - **GraphiQL Interface**: open http://localhost:4000/graphql in a browser
//! - **In-Memory Storage**: messages live until the process exits
//!
//! ## Configuration
//!
//! Settings are read from `SERVER_*` environment variables (a `.env` file
//! is loaded first if present) and can be overridden on the command line:
//!
//! ```text
//! cargo run --bin server -- --port 8080 --no-graphiql
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use dice_messages::{GraphQLServerBuilder, ServerConfig};
use dotenv::dotenv;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dice-messages-server")]
#[command(about = "GraphQL API server for dice rolls and an in-memory message board")]
#[command(version)]
struct Cli {
    /// Address to listen on (overrides SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides SERVER_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Disable the GraphiQL explorer
    #[arg(long)]
    no_graphiql: bool,

    /// Disable the permissive CORS layer
    #[arg(long)]
    no_cors: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // The .env file is optional
    let env_loaded = dotenv().is_ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if !env_loaded {
        debug!("No .env file loaded; using process environment only");
    }

    info!("🚀 Starting Dice Messages Server...");

    let mut config = ServerConfig::from_env().context("Failed to load server configuration")?;
    if cli.no_graphiql {
        config.graphiql_enabled = false;
    }
    if cli.no_cors {
        config.cors_enabled = false;
    }

    info!("GraphiQL enabled: {}", config.graphiql_enabled);
    info!("CORS enabled: {}", config.cors_enabled);

    let mut builder = GraphQLServerBuilder::new().with_config(config);
    if let Some(host) = cli.host {
        builder = builder.with_host(host);
    }
    if let Some(port) = cli.port {
        builder = builder.with_port(port);
    }

    builder
        .build_and_run()
        .await
        .context("GraphQL server failed")?;

    Ok(())
}
