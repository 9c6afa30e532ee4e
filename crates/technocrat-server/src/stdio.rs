use crate::protocol;
use crate::server::McpServer;
use std::io::{BufRead, Write};

/// Serve JSON-RPC over stdin/stdout until stdin closes.
pub fn run(server: &McpServer) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    tracing::info!(start_dir = %server.start_dir().display(), "mcp stdio server started");
    serve(server, stdin.lock(), stdout.lock())?;
    tracing::info!("stdin closed, mcp stdio server exiting");
    Ok(())
}

/// One request per line in, one response line out, strictly in order.
/// A line that is not valid UTF-8 gets a parse error reply and the loop
/// moves on to the next line.
pub fn serve<R: BufRead, W: Write>(
    server: &McpServer,
    mut input: R,
    mut output: W,
) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => protocol::handle_message(server, line.trim_end()),
            Err(e) => {
                tracing::warn!(error = %e, "non utf-8 line on stdin");
                Some(protocol::parse_error(e))
            }
        };
        if let Some(response) = response {
            serde_json::to_writer(&mut output, &response)?;
            writeln!(output)?;
            output.flush()?;
        }
    }
    Ok(())
}
