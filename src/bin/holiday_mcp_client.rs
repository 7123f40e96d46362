//! Command-line client for the holiday MCP server.
//!
//! Spawns the server (or connects over TCP), then lists tools, runs the
//! arithmetic demo, or calls a single tool.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use holiday_mcp_server::client::{ClientDriver, ServerDescriptor, Session};
use holiday_mcp_server::core::config::LoggingConfig;
use holiday_mcp_server::core::init_logging;

/// Client driver for MCP tool servers
#[derive(Parser, Debug)]
#[command(name = "holiday_mcp_client")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Server executable to spawn over stdio
    #[arg(long, env = "HOLIDAY_MCP_SERVER", default_value = "holiday_mcp_server")]
    server: String,

    /// Extra arguments passed to the server executable
    #[arg(long = "server-arg")]
    server_args: Vec<String>,

    /// Connect to a TCP server at this address instead of spawning one
    #[cfg(feature = "tcp")]
    #[arg(long)]
    tcp: Option<String>,

    /// Per-call timeout in seconds (0 disables)
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the server's tools
    List,

    /// Run add(5, 3) and multiply(4, 6)
    Demo,

    /// Call one tool
    Call {
        /// Tool name
        name: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

impl Cli {
    fn descriptor(&self) -> ServerDescriptor {
        #[cfg(feature = "tcp")]
        if let Some(address) = &self.tcp {
            return ServerDescriptor::tcp(address.clone());
        }

        self.server_args
            .iter()
            .fold(ServerDescriptor::process(&self.server), |d, arg| d.arg(arg))
    }

    fn call_timeout(&self) -> Option<Duration> {
        Some(self.timeout)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LoggingConfig {
        level: if cli.verbose { "debug" } else { "warn" }.to_string(),
        file: None,
    })?;

    let mut session = ClientDriver::new()
        .with_call_timeout(cli.call_timeout())
        .connect(&cli.descriptor())
        .await
        .context("failed to connect to server")?;

    let outcome = run(&cli.command, &mut session).await;
    session.close().await.ok();
    outcome
}

async fn run(command: &Command, session: &mut Session) -> Result<()> {
    match command {
        Command::List => {
            for tool in session.list_tools().await? {
                println!(
                    "{}: {}",
                    tool.name,
                    tool.description.as_deref().unwrap_or("")
                );
            }
        }
        Command::Demo => {
            let names: Vec<String> = session
                .list_tools()
                .await?
                .into_iter()
                .map(|t| t.name.to_string())
                .collect();
            println!("Connected to server with tools: {:?}", names);

            let sum = session.call("add", json!({"a": 5, "b": 3})).await?;
            println!("5 + 3 = {}", sum.text());

            let product = session.call("multiply", json!({"a": 4, "b": 6})).await?;
            println!("4 * 6 = {}", product.text());
        }
        Command::Call { name, args } => {
            let arguments: Value =
                serde_json::from_str(args).context("--args must be valid JSON")?;
            if !arguments.is_object() {
                bail!("--args must be a JSON object");
            }
            let output = session.call(name, arguments).await?;
            println!("{}", output.text());
            if let Some(structured) = output.structured {
                println!("{}", serde_json::to_string_pretty(&structured)?);
            }
        }
    }
    Ok(())
}
