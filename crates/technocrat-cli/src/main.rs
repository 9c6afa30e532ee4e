mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{context::ContextSubcommand, feature::FeatureSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "technocrat",
    about = "Spec-driven development scaffolding and an MCP prompt server",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory to act from (default: current directory)
    #[arg(long, global = true, env = "TECHNOCRAT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a technocrat workspace in the current directory
    Init {
        /// Agent to install command files for (repeatable)
        #[arg(long = "agent", value_name = "NAME")]
        agents: Vec<String>,

        /// Overwrite command files and document templates that already exist
        #[arg(long)]
        force: bool,
    },

    /// Create and inspect features under specs/
    Feature {
        #[command(subcommand)]
        subcommand: FeatureSubcommand,
    },

    /// Maintain agent context files
    Context {
        #[command(subcommand)]
        subcommand: ContextSubcommand,
    },

    /// Render a command prompt for the current workspace
    Prompt {
        /// Command template name (spec, plan, tasks, ...)
        command: String,

        /// User input substituted for $ARGUMENTS
        #[arg(long, short = 'i', default_value = "")]
        input: String,
    },

    /// Report which external tools are on PATH
    Check,

    /// Run as an MCP stdio server
    Mcp,

    /// Run the MCP server over HTTP
    Serve {
        /// Address to bind (default: server.host from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,

        /// Per-request timeout in seconds (default: server.timeout_secs from config)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Mcp | Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout carries the stdio protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let start = root::resolve_start(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { agents, force } => cmd::init::run(&start, &agents, force, cli.json),
        Commands::Feature { subcommand } => cmd::feature::run(&start, subcommand, cli.json),
        Commands::Context { subcommand } => cmd::context::run(&start, subcommand, cli.json),
        Commands::Prompt { command, input } => cmd::prompt::run(&start, &command, &input),
        Commands::Check => cmd::check::run(&start, cli.json),
        Commands::Mcp => cmd::mcp::run(&start),
        Commands::Serve {
            host,
            port,
            timeout_secs,
        } => cmd::serve::run(&start, host, port, timeout_secs),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
