pub mod error;
pub mod http;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod stdio;
pub mod tools;

pub use error::{AppError, McpError};
pub use http::{build_router, serve, serve_on, DEFAULT_TIMEOUT};
pub use server::McpServer;
