use crate::root::workspace_root;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use technocrat_core::config::Config;
use technocrat_server::McpServer;

/// Flags override `server:` in the workspace config, which overrides the
/// built-in defaults.
pub fn run(
    start: &Path,
    host: Option<String>,
    port: Option<u16>,
    timeout_secs: Option<u64>,
) -> anyhow::Result<()> {
    let config = Config::load(&workspace_root(start)).context("failed to load config.yaml")?;
    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);
    let timeout = Duration::from_secs(timeout_secs.unwrap_or(config.server.timeout_secs));

    let server = Arc::new(McpServer::new(start)?);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(technocrat_server::serve(server, &host, port, timeout))
}
