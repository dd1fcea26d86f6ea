//! Server mode CLI logic
//!
//! Contains the core logic for running the HTTP resolution server.

use crate::{server::app, utils::version};
use anyhow::{Context, Result};

use super::{build_env_filter, init_logging, load_settings};

/// Arguments for server mode
#[derive(Debug)]
pub struct ServerArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub config: Option<String>,
    pub verbose: bool,
}

/// Run server mode with the given arguments
pub async fn run_server_mode(args: ServerArgs) -> Result<()> {
    // Configuration precedence:
    // 1. Command line arguments (highest priority)
    // 2. Environment variables
    // 3. Configuration file (from --config, RESOLVER_CONFIG or default location)
    // 4. Default values (lowest priority)
    let mut settings =
        load_settings(args.config.as_deref()).context("Failed to load configuration")?;
    settings
        .validate()
        .context("Invalid server configuration")?;

    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.logging.verbose = args.verbose;

    init_logging(build_env_filter(args.verbose, &settings.logging.level), false);

    tracing::info!(
        "Starting resolver server {}",
        version::get_detailed_version()
    );
    tracing::debug!("Effective configuration: {:?}", settings);

    let addr = parse_and_bind_address(&settings.server.host, settings.server.port).await?;
    let app = app::create_app(settings).context("Failed to build resolver")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not listen on {}", addr))?;

    tracing::info!(
        "Resolver server v{} listening on {}",
        version::get_version(),
        listener.local_addr().unwrap_or(addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse host string and pick the address to bind
///
/// `::` is tried first; when the host has no IPv6 stack the server falls
/// back to `0.0.0.0`.
pub async fn parse_and_bind_address(host: &str, port: u16) -> Result<std::net::SocketAddr> {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    if let Ok(ip) = host.parse::<IpAddr>() {
        let addr = SocketAddr::new(ip, port);

        if ip == IpAddr::V6(Ipv6Addr::UNSPECIFIED) {
            if let Err(e) = tokio::net::TcpListener::bind(addr).await {
                tracing::warn!(
                    "Could not listen on [::]:{} (Caused by {}), falling back to 0.0.0.0",
                    port,
                    e
                );
                return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
            }
        }

        tracing::debug!("Parsed address: {}", addr);
        return Ok(addr);
    }

    anyhow::bail!(
        "Invalid host address: {}. Use '::' for IPv6 or '0.0.0.0' for IPv4",
        host
    );
}
