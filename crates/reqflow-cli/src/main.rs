//! reqflow - command line front end
//!
//! Runs the tool-calling agent against the configured services, lists what
//! those services offer, serves the requirements tools over MCP, or runs the
//! requirements pipeline locally.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reqflow_core::{ConfigFile, Logger, TracingLogger};

#[derive(Parser)]
#[command(name = "reqflow")]
#[command(about = "Requirements agent: discover MCP tools and let a model drive them", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/reqflow/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging when RUST_LOG is unset
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover tools and answer a request with the agent
    Run {
        /// The request, e.g. "Gather requirements for a todo app"
        #[arg(required = true, num_args = 1..)]
        request: Vec<String>,
    },

    /// List discovered operations and unreachable services
    Tools,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Serve generate_software_requirements and generate_software_design over MCP
    Serve {
        /// Bind address (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the requirements pipeline locally and print its result
    Pipeline {
        /// Project description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,

        /// Generate a system design instead of requirements
        #[arg(long)]
        design: bool,

        /// Image output path (overrides pipeline.output_file)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Credentials may live in a local .env file
    let _ = dotenvy::dotenv();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(ConfigFile::default_path);
    if let Commands::Init { force } = cli.command {
        return commands::init(&config_path, force);
    }

    let config = ConfigFile::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());

    match cli.command {
        Commands::Run { request } => commands::run(config, &request.join(" "), logger).await,
        Commands::Tools => commands::tools(config, logger).await,
        Commands::Init { .. } => Ok(()),
        Commands::Serve { host, port } => commands::serve(config, host, port, logger).await,
        Commands::Pipeline {
            description,
            design,
            output,
        } => commands::pipeline(config, &description.join(" "), design, output, logger).await,
    }
}
