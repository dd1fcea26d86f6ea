//! Two-step scrape of a Terabox share
//!
//! 1. GET the share link, follow redirects to the canonical page and read
//!    the js token and log id out of its HTML.
//! 2. GET the listing endpoint with those values plus the `surl` short-link
//!    id from the redirect target.
//!
//! Both calls share one cookie jar. No retries: the first failure ends the
//! resolution.

use reqwest::{Client, header};
use tracing::{debug, warn};
use url::Url;

use super::extractor::{DelimiterExtractor, TokenExtractor};
use super::network::{ClientFactory, seeded_jar};
use crate::{
    Error, Result,
    config::{Settings, settings::ProviderSettings},
    types::{FileListing, ProviderSession},
};

/// Source of file listings for a share link
#[async_trait::async_trait]
pub trait ShareProvider: Send + Sync {
    /// Fetch the complete first page of the share's file listing
    async fn fetch_listing(&self, share_url: &Url) -> Result<FileListing>;
}

/// Scraper for the Terabox family of hosts
pub struct TeraboxScraper<E: TokenExtractor = DelimiterExtractor> {
    provider: ProviderSettings,
    list_endpoint: Url,
    clients: ClientFactory,
    extractor: E,
}

impl<E: TokenExtractor> std::fmt::Debug for TeraboxScraper<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeraboxScraper")
            .field("list_endpoint", &self.list_endpoint.as_str())
            .field("clients", &self.clients)
            .finish_non_exhaustive()
    }
}

impl TeraboxScraper {
    /// Create a scraper using delimiter extraction
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_extractor(settings, DelimiterExtractor::default())
    }
}

impl<E: TokenExtractor> TeraboxScraper<E> {
    /// Create a scraper with a custom extraction strategy
    pub fn with_extractor(settings: &Settings, extractor: E) -> Result<Self> {
        let list_endpoint = Url::parse(&settings.provider.list_endpoint).map_err(|e| {
            Error::config(
                "provider.list_endpoint",
                &format!("Invalid URL '{}': {}", settings.provider.list_endpoint, e),
            )
        })?;

        if settings.provider.cookie.is_none() {
            warn!("No provider cookie configured; the listing endpoint may refuse requests");
        }

        Ok(Self {
            provider: settings.provider.clone(),
            list_endpoint,
            clients: ClientFactory::new(settings)?,
            extractor,
        })
    }

    /// Step one: load the share page and scrape the session values
    pub async fn open_session(&self, client: &Client, share_url: &Url) -> Result<ProviderSession> {
        let timeout = self.clients.request_timeout_secs();

        let response = client
            .get(share_url.clone())
            .header(header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| Error::from_upstream("share_page", e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream_status("share_page", status.as_u16()));
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| Error::from_upstream("share_page", e, timeout))?;

        debug!(
            final_url = %final_url,
            body_len = html.len(),
            "Loaded share page"
        );

        let js_token = self.extractor.js_token(&html).ok_or_else(|| {
            Error::upstream_invalid("js_token", "anti-bot token delimiters not found in share page")
        })?;
        let log_id = self.extractor.log_id(&html).ok_or_else(|| {
            Error::upstream_invalid("log_id", "log id delimiters not found in share page")
        })?;

        let short_url = final_url
            .query_pairs()
            .find(|(key, _)| key == "surl")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                Error::upstream_invalid(
                    "surl",
                    &format!("redirect target {} carries no surl", final_url),
                )
            })?;

        Ok(ProviderSession {
            js_token,
            log_id,
            short_url,
            referer: final_url.to_string(),
        })
    }

    /// Step two: query the listing endpoint for the share
    pub async fn list(&self, client: &Client, session: &ProviderSession) -> Result<FileListing> {
        let timeout = self.clients.request_timeout_secs();
        let page_size = self.provider.page_size.to_string();

        let response = client
            .get(self.list_endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .header(header::REFERER, session.referer.as_str())
            .query(&[
                ("app_id", self.provider.app_id.as_str()),
                ("web", self.provider.web.as_str()),
                ("channel", self.provider.channel.as_str()),
                ("clienttype", self.provider.client_type.as_str()),
                ("jsToken", session.js_token.as_str()),
                ("dplogid", session.log_id.as_str()),
                ("page", "1"),
                ("num", page_size.as_str()),
                ("order", "time"),
                ("desc", "1"),
                ("site_referer", session.referer.as_str()),
                ("shorturl", session.short_url.as_str()),
                ("root", "1"),
            ])
            .send()
            .await
            .map_err(|e| Error::from_upstream("share_list", e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream_status("share_list", status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::from_upstream("share_list", e, timeout))?;

        let listing = FileListing::from_list_body(&body)?;
        debug!(entries = listing.len(), "Fetched share listing");
        Ok(listing)
    }
}

#[async_trait::async_trait]
impl<E: TokenExtractor> ShareProvider for TeraboxScraper<E> {
    async fn fetch_listing(&self, share_url: &Url) -> Result<FileListing> {
        let jar = seeded_jar(
            self.provider.cookie.as_deref(),
            &[share_url, &self.list_endpoint],
        );
        let client = self.clients.session_client(jar)?;

        let session = self.open_session(&client, share_url).await?;
        debug!(short_url = %session.short_url, "Opened provider session");

        self.list(&client, &session).await
    }
}
