use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use fess_mcp::config::load_config;
use fess_mcp::fess::FessClient;
use fess_mcp::mcp::McpServer;

/// MCP server for Fess document search.
#[derive(Parser)]
#[command(name = "fess-mcp-server", about = "MCP server for Fess document search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio
    Serve {
        /// Path to the configuration file
        #[arg(short, long, default_value = "fess-mcp.json")]
        config: PathBuf,
        /// Fess base URL (overrides the configured value)
        #[arg(short, long)]
        base_url: Option<String>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> fess_mcp::errors::Result<()> {
    match cli.command {
        Commands::Serve { config, base_url } => {
            let mut config = load_config(&config)?;
            if let Some(base_url) = base_url {
                config.base_url = base_url;
            }
            let backend = Arc::new(FessClient::new(config.base_url.clone()));
            let server = McpServer::new(backend, config);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server.run())?;
        }
    }
    Ok(())
}

/// Logs go to stderr; stdout carries the JSON-RPC stream.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
