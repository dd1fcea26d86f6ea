//! Link submission and concurrent resolution
//!
//! Each submitted link is checked against the host allow-list, sealed into
//! its own token and sent to the resolution endpoint. Requests run
//! concurrently; a failing link never holds up the others and outcomes come
//! back in submission order.

use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::debug;
use url::Url;

use crate::{
    Error, Result,
    config::Settings,
    provider::HostAllowList,
    token::TokenCodec,
    types::{ErrorResponse, FileEntry},
    utils::version,
};

/// Extra time granted on top of the server's two sequential provider calls
const ENDPOINT_GRACE: Duration = Duration::from_secs(5);

/// Split a comma-separated submission into trimmed, non-empty links
pub fn parse_links(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
        .collect()
}

/// Result of resolving one submitted link
#[derive(Debug)]
pub struct LinkOutcome {
    /// The link as submitted
    pub link: String,
    /// Resolved entry or the reason it could not be resolved
    pub result: Result<FileEntry>,
}

/// Client side of the resolution protocol
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    codec: TokenCodec,
    allow_list: HostAllowList,
    http: Client,
    api_url: Url,
    ttl_ms: u64,
    request_timeout_secs: u64,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("api_url", &self.inner.api_url.as_str())
            .field("ttl_ms", &self.inner.ttl_ms)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(settings: &Settings) -> Result<Self> {
        let endpoint = Url::parse(&settings.client.endpoint).map_err(|e| {
            Error::config(
                "client.endpoint",
                &format!("Invalid URL '{}': {}", settings.client.endpoint, e),
            )
        })?;
        let api_url = endpoint.join("api")?;

        let request_timeout = settings.network.request_timeout * 2 + ENDPOINT_GRACE;
        let http = Client::builder()
            .user_agent(version::client_user_agent())
            .connect_timeout(settings.network.connect_timeout)
            .timeout(request_timeout)
            .no_proxy()
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(Inner {
                codec: TokenCodec::new(&settings.token.secret)?,
                allow_list: HostAllowList::from_settings(&settings.provider),
                http,
                api_url,
                ttl_ms: settings.token.ttl_ms,
                request_timeout_secs: request_timeout.as_secs(),
            }),
        })
    }

    /// Endpoint the orchestrator sends resolution requests to
    pub fn api_url(&self) -> &Url {
        &self.inner.api_url
    }

    /// Validate, seal and resolve a single link
    pub async fn resolve_one(&self, link: &str, index: usize) -> Result<FileEntry> {
        let inner = &self.inner;
        let share_url = inner.allow_list.validate(link)?;
        let token = inner.codec.issue(share_url.as_str(), inner.ttl_ms)?;

        debug!(link = %share_url, index, "Submitting resolution request");

        let index = index.to_string();
        let response = inner
            .http
            .get(inner.api_url.clone())
            .query(&[("data", token.as_str()), ("index", index.as_str())])
            .send()
            .await
            .map_err(|e| Error::from_upstream("resolve", e, inner.request_timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_upstream("resolve", e, inner.request_timeout_secs))?;

        if status != StatusCode::OK {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown Error")
                        .to_string()
                });
            return Err(Error::ResolverRejected {
                status: status.as_u16(),
                message,
            });
        }

        FileEntry::from_value(serde_json::from_str(&body)?)
    }

    /// Resolve every link concurrently, each at `index` within its own listing
    pub async fn resolve_all(&self, links: Vec<String>, index: usize) -> Vec<LinkOutcome> {
        let mut tasks = JoinSet::new();

        for (position, link) in links.iter().enumerate() {
            let orchestrator = self.clone();
            let link = link.clone();
            tasks.spawn(async move {
                let result = orchestrator.resolve_one(&link, index).await;
                (position, result)
            });
        }

        let mut results: Vec<Option<Result<FileEntry>>> = links.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, result)) => results[position] = Some(result),
                Err(e) => tracing::error!("Resolution task failed: {}", e),
            }
        }

        links
            .into_iter()
            .zip(results)
            .map(|(link, result)| LinkOutcome {
                link,
                result: result
                    .unwrap_or_else(|| Err(Error::internal("resolution task did not complete"))),
            })
            .collect()
    }
}
