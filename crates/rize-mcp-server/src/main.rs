use std::path::PathBuf;

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use rize_mcp_server::runtime::logging::LoggingLayerBuilder;
use rize_mcp_server::runtime::{self, Config};
use rize_mcp_server::server::Server;
use tracing::info;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the MCP server
#[derive(Debug, clap::Parser)]
#[command(
    version,
    styles = STYLES,
    about = "Rize MCP Server - track and schedule time in Rize from an AI agent",
)]
struct Args {
    /// Path to a YAML config file. Without one, configuration is read from the environment.
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config: Config = match Args::parse().config {
        Some(path) => runtime::read_config(path)?,
        None => runtime::read_config_from_env()?,
    };

    let (logging_layer, _guard) = LoggingLayerBuilder::new().build(&config.logging)?;
    Registry::default()
        .with(logging_layer)
        .with(config.logging.env_filter()?)
        .try_init()?;

    info!(
        "Rize MCP Server v{} // (c) Rize MCP contributors // Licensed under MIT",
        env!("CARGO_PKG_VERSION")
    );

    let client = config.rize.client()?;
    info!(endpoint = %client.endpoint(), "Using Rize API");

    Ok(Server::builder().client(client).build().start().await?)
}
