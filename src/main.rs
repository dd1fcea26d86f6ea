//! Unified CLI for the Terabox share-link resolver
//!
//! # Usage
//!
//! ## Server Mode
//! ```bash
//! RESOLVER_SECRET=... terabox-resolver server --port 4416 --host 0.0.0.0
//! ```
//!
//! ## Resolve Mode
//! ```bash
//! RESOLVER_SECRET=... terabox-resolver resolve "https://terabox.com/s/abc,https://terabox.app/s/def"
//! ```
//!
//! ## Help and Version
//! ```bash
//! terabox-resolver --version
//! terabox-resolver --help
//! terabox-resolver server --help
//! ```

use clap::{Parser, Subcommand};

use terabox_resolver::cli::{
    resolve::{ResolveArgs, run_resolve_mode},
    server::{ServerArgs, run_server_mode},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "terabox-resolver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server mode
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Configuration file path
        #[arg(long)]
        config: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Resolve share links through a running server
    Resolve {
        /// Comma-separated share links
        #[arg(value_name = "LINKS")]
        links: String,

        /// File position within each link's listing
        #[arg(short, long, default_value_t = 0)]
        index: usize,

        /// Resolution server base URL
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Configuration file path
        #[arg(long)]
        config: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            port,
            host,
            config,
            verbose,
        } => {
            let args = ServerArgs {
                port,
                host,
                config,
                verbose,
            };
            run_server_mode(args).await
        }
        Commands::Resolve {
            links,
            index,
            endpoint,
            config,
            json,
            verbose,
        } => {
            let args = ResolveArgs {
                links,
                index,
                endpoint,
                config,
                json,
                verbose,
            };
            run_resolve_mode(args).await
        }
    }
}
