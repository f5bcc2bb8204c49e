//! CLI entry point for task-bridge.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rmcp::ServiceExt;
use task_bridge_app::{AppConfig, ProviderRegistry, build_registry};
use task_bridge_core::{ProviderKind, TaskStatus};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod mcp;

/// Remote task lists behind one task model, served over MCP.
#[derive(Parser, Debug)]
#[command(
    name = "task-bridge",
    version,
    about = "task-bridge: Google Tasks (and friends) as MCP tools"
)]
struct Cli {
    /// Config file (defaults to the per-user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve MCP over stdio (default).
    Serve,

    /// List registered providers.
    Providers,

    /// List task lists of the configured account.
    Lists {
        #[arg(long, default_value_t = ProviderKind::Google)]
        provider: ProviderKind,
    },

    /// List tasks of one list.
    Tasks {
        #[arg(long, default_value_t = ProviderKind::Google)]
        provider: ProviderKind,
        #[arg(long)]
        list: String,
        #[arg(long)]
        status: Vec<TaskStatus>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search every list for a text.
    Search {
        #[arg(long, default_value_t = ProviderKind::Google)]
        provider: ProviderKind,
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Validate the configured credentials.
    Check,
}

fn main() -> Result<()> {
    let Cli { config, cmd } = Cli::parse();

    install_tracing();

    let config = AppConfig::load(config.as_deref())?;
    let registry = Arc::new(build_registry(&config)?);
    tokio::runtime::Runtime::new()?.block_on(execute_command(cmd.unwrap_or(Command::Serve), registry))
}

async fn execute_command(command: Command, registry: Arc<ProviderRegistry>) -> Result<()> {
    match command {
        Command::Serve => {
            info!(providers = registry.len(), "starting MCP server on stdio");
            let server = mcp::TaskBridgeServer::new(registry);
            let transport = (tokio::io::stdin(), tokio::io::stdout());
            let server = server.serve(transport).await.map_err(|e| anyhow::anyhow!("{e:?}"))?;
            server.waiting().await.map_err(|e| anyhow::anyhow!("{e:?}"))?;
            Ok(())
        }
        other => commands::run(other, &registry).await,
    }
}

fn install_tracing() {
    // stdout carries the MCP transport, so logs go to stderr. RUST_LOG overrides the INFO default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
