use anyhow::Result;
use javadocky::mcp::DockyMcp;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting JavaDocky MCP server");
    let service = DockyMcp::new().serve(stdio()).await?;
    service.waiting().await?;
    info!("JavaDocky MCP server shutting down");
    Ok(())
}
