//! Resolve mode CLI logic
//!
//! Seals each submitted link, asks the resolution server for it and prints
//! the result.

use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};
use std::time::Duration;

use super::{build_env_filter, init_logging, load_settings};
use crate::client::{Banner, Orchestrator, parse_links, render_entry, render_json};

/// Arguments for resolve mode
#[derive(Debug)]
pub struct ResolveArgs {
    /// Comma-separated share links
    pub links: String,
    /// File position within each link's listing
    pub index: usize,
    /// Resolution server base URL
    pub endpoint: Option<String>,
    pub config: Option<String>,
    /// Print machine-readable JSON instead of text
    pub json: bool,
    pub verbose: bool,
}

/// Run resolve mode; fails when any link could not be resolved
pub async fn run_resolve_mode(args: ResolveArgs) -> Result<()> {
    let mut settings =
        load_settings(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(endpoint) = args.endpoint {
        settings.client.endpoint = endpoint;
    }
    settings.logging.verbose = args.verbose;

    init_logging(build_env_filter(args.verbose, &settings.logging.level), true);
    settings.validate().context("Invalid client configuration")?;

    let links = parse_links(&args.links);
    if links.is_empty() {
        anyhow::bail!("No links given");
    }

    let orchestrator = Orchestrator::new(&settings).context("Failed to create client")?;
    tracing::debug!(
        links = links.len(),
        endpoint = %orchestrator.api_url(),
        "Resolving links"
    );

    let total = links.len();
    let outcomes = orchestrator.resolve_all(links, args.index).await;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    let mut stdout = std::io::stdout();
    if args.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&render_json(&outcomes))?)?;
    } else {
        let mut banner = Banner::new(Duration::from_secs(settings.client.error_display_secs));
        for (position, outcome) in outcomes.iter().enumerate() {
            match &outcome.result {
                Ok(entry) => {
                    if total > 1 {
                        writeln!(stdout, "[{}] {}", position + 1, outcome.link)?;
                    }
                    writeln!(stdout, "{}", render_entry(entry))?;
                }
                Err(e) => {
                    tracing::debug!(link = %outcome.link, "Resolution failed: {}", e);
                    banner.push_failure(position, &outcome.link, e);
                }
            }
        }
        stdout.flush()?;

        let mut stderr = std::io::stderr();
        let interactive = stderr.is_terminal();
        banner.show(&mut stderr, interactive).await?;
    }

    if failed > 0 {
        anyhow::bail!("{} of {} link(s) could not be resolved", failed, total);
    }

    Ok(())
}
