use std::path::Path;
use technocrat_server::{stdio, McpServer};

pub fn run(start: &Path) -> anyhow::Result<()> {
    let server = McpServer::new(start)?;
    stdio::run(&server)
}
