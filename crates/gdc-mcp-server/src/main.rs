use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use gdc_mcp_server::server::Server;
use std::path::PathBuf;
use tracing::info;

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the MCP server
#[derive(Debug, clap::Parser)]
#[command(
    styles = STYLES,
    about = "GDC MCP Server - query the NCI Genomic Data Commons from an AI agent",
)]
struct Args {
    /// Path to the YAML configuration file
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => runtime::read_config(path)?,
        None => runtime::read_config_from_env()?,
    };
    let _logging_guard = runtime::setup_logging(&config)?;

    info!("GDC MCP Server v{}", std::env!("CARGO_PKG_VERSION"));

    Ok(Server::builder()
        .transport(config.transport)
        .endpoint(config.endpoint.into_inner())
        .build()
        .start()
        .await?)
}
