//! doc-replace -- MCP server for find/replace and highlighting on a document.
//!
//! Usage: doc-replace [--document <path>] [--no-autosave]

use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr so it does not interfere with MCP stdio.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let document = args
        .iter()
        .skip_while(|a| *a != "--document")
        .nth(1)
        .map(PathBuf::from);

    let config = doc_replace::server::McpServerConfig {
        document,
        autosave: !args.iter().any(|a| a == "--no-autosave"),
    };

    doc_replace::run_mcp_server(config)
}
