//! Harness binary: runs an SSE client node against a live endpoint.
//!
//! Stands in for the visual flow runtime during manual testing. Outbound
//! messages are printed as JSON lines; errors and status updates go to the
//! logger.

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use host::{FlowHost, FlowMessage, NodeStatus};
use log::*;
use sse_client::{NodeConfig, OutputMode, SseClientNode};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "flow-sse-node")]
#[command(about = "Open an SSE subscription and print received events")]
struct Cli {
    /// SSE endpoint to subscribe to
    #[arg(long)]
    url: String,

    /// Subscription id (defaults to a generated uuid)
    #[arg(long)]
    uuid: Option<String>,

    /// Named SSE event to listen for
    #[arg(long, default_value = "message")]
    event: String,

    /// Payload decoding mode
    #[arg(long, value_enum, default_value_t = OutputChoice::Raw)]
    output: OutputChoice,

    /// Default header set as a JSON-encoded object string
    #[arg(long)]
    headers: Option<String>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum OutputChoice {
    /// Parse event payloads as JSON, falling back to the raw string
    Json,
    /// Pass payloads through untouched
    Raw,
}

impl From<OutputChoice> for OutputMode {
    fn from(choice: OutputChoice) -> Self {
        match choice {
            OutputChoice::Json => OutputMode::Json,
            OutputChoice::Raw => OutputMode::Raw,
        }
    }
}

/// Host implementation that prints messages and logs everything else.
struct LoggingHost;

#[async_trait]
impl FlowHost for LoggingHost {
    async fn send(&self, message: FlowMessage) {
        match serde_json::to_string(&message) {
            Ok(line) => println!("{line}"),
            Err(e) => error!("Failed to serialize outbound message: {e}"),
        }
    }

    fn report_error(&self, message: String) {
        error!("{message}");
    }

    fn set_status(&self, status: NodeStatus) {
        info!("node status: {}", status.text);
    }
}

fn init_logger(level: LevelFilter) {
    let mut builder = simplelog::ConfigBuilder::new();
    builder.set_time_format_rfc3339();

    simplelog::TermLogger::init(
        level,
        builder.build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("Failed to start simplelog");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let host = Arc::new(LoggingHost);
    let config = NodeConfig {
        event: cli.event,
        output: cli.output.into(),
        headers: cli.headers,
    };

    let node = match SseClientNode::new(config, host.clone()) {
        Ok(node) => node,
        Err(e) => {
            host.set_status(NodeStatus::error(e.to_string()));
            return Err(e.into());
        }
    };

    let uuid = cli
        .uuid
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    info!("opening subscription {uuid} to {}", cli.url);

    node.handle_input(&serde_json::json!({
        "payload": { "url": cli.url, "uuid": uuid }
    }));

    info!("press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    node.close();
    Ok(())
}
