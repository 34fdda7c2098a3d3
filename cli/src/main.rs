//! CLI entrypoint for corral
//!
//! Thin binary that wires the layers together: loads configuration, builds
//! a [`ToolRegistry`] rooted at the chosen workspace, and exposes the tool
//! surface for direct use — listing tools, exporting declarations, and
//! executing a single call. Ctrl-C cancels an in-flight invocation through
//! the same cancellation token the agent loop would use.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use corral_application::ports::invocation_logger::InvocationLogger;
use corral_application::ports::tool_executor::ToolExecutorPort;
use corral_domain::ToolCall;
use corral_infrastructure::{ConfigLoader, JsonlInvocationLogger, ToolRegistry};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "corral", version, about = "Workspace-confined tool execution for AI agents")]
struct Cli {
    /// Workspace root all tool effects are confined to (default: current directory)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip config files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Write a JSONL invocation audit log to this path
    #[arg(long, global = true)]
    audit_log: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the registered tools
    Tools,
    /// Print tool declarations as JSON for a function-calling model API
    Schema {
        /// Export only non-mutating tools
        #[arg(long)]
        read_only: bool,
    },
    /// Execute a single tool call
    Exec {
        /// Tool name (e.g. read_file)
        tool: String,
        /// Arguments as a JSON object (e.g. '{"path": "/proj/a.txt"}')
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let workspace = match cli.workspace {
        Some(workspace) => workspace,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    info!("Workspace root: {}", workspace.display());

    let mut registry = ToolRegistry::with_builtins(&workspace)
        .map_err(|e| anyhow::anyhow!("Failed to open workspace: {}", e))?
        .with_limits(config.limits.to_limits())
        .with_shell_policy(config.shell.to_policy());

    if let Some(path) = &cli.audit_log {
        match JsonlInvocationLogger::new(path) {
            Some(logger) => {
                registry = registry.with_logger(Arc::new(logger) as Arc<dyn InvocationLogger>);
            }
            None => bail!("Cannot open audit log at {}", path.display()),
        }
    }

    match cli.command {
        Command::Tools => {
            let mut tools: Vec<_> = registry.spec().all().collect();
            tools.sort_by_key(|t| &t.name);
            for tool in tools {
                println!("{:<22} [{}] {}", tool.name, tool.capability, tool.description);
            }
        }
        Command::Schema { read_only } => {
            let declarations = if read_only {
                registry.read_only_declarations()
            } else {
                registry.declarations()
            };
            println!("{}", serde_json::to_string_pretty(&declarations)?);
        }
        Command::Exec { tool, args } => {
            let arguments: HashMap<String, serde_json::Value> =
                serde_json::from_str(&args).context("--args must be a JSON object")?;
            let call = ToolCall {
                tool_name: tool,
                arguments,
            };

            let token = CancellationToken::new();
            let cancel = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            });

            let result = registry.invoke(&call, &token).await;
            println!("{}", result.render());
            if !result.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
