//! # Resolution pipeline
//!
//! [`Resolver`] turns validated request parameters into one provider file
//! entry:
//!
//! 1. open the token (fails closed on any malformed input)
//! 2. reject it when expired by the server clock
//! 3. pick the requested link and re-check it against the host allow-list
//! 4. reject the request when that link of the token was already resolved
//! 5. scrape the provider and select the requested entry
//!
//! Steps 1 to 4 make no outbound call. A request failing steps 1 to 3 does
//! not use up the token.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use terabox_resolver::{Resolver, Settings, types::ResolveQuery};
//!
//! # async fn example() -> terabox_resolver::Result<()> {
//! let mut settings = Settings::default();
//! settings.token.secret = std::env::var("RESOLVER_SECRET").unwrap_or_default();
//! let resolver = Resolver::new(&settings)?;
//!
//! let token = resolver.codec().issue("https://terabox.com/s/abc123", 20_000)?;
//! let params = ResolveQuery::new(token, 0).validate()?;
//! let entry = resolver.resolve(&params).await?;
//! println!("{}", entry["server_filename"]);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::{
    Error, Result,
    config::Settings,
    provider::{HostAllowList, ShareProvider, TeraboxScraper},
    token::{ReplayGuard, TokenCodec, TokenPayload, now_millis},
    types::ResolveParams,
};

/// Server-side resolver shared by all requests
pub struct Resolver {
    codec: TokenCodec,
    replay_guard: Option<ReplayGuard>,
    allow_list: HostAllowList,
    provider: Arc<dyn ShareProvider>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("single_use", &self.replay_guard.is_some())
            .field("allow_list", &self.allow_list)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver backed by the Terabox scraper
    pub fn new(settings: &Settings) -> Result<Self> {
        let provider = Arc::new(TeraboxScraper::new(settings)?);
        Self::with_provider(settings, provider)
    }

    /// Create a resolver backed by any listing source
    pub fn with_provider(settings: &Settings, provider: Arc<dyn ShareProvider>) -> Result<Self> {
        Ok(Self {
            codec: TokenCodec::new(&settings.token.secret)?,
            replay_guard: settings.token.single_use.then(ReplayGuard::new),
            allow_list: HostAllowList::from_settings(&settings.provider),
            provider,
        })
    }

    /// Codec keyed with this resolver's secret
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Open a token and check its expiry without touching the provider
    pub fn admit(&self, data: &str, now_ms: i64) -> Result<TokenPayload> {
        let payload = self.codec.decode(data)?;

        debug!(
            target_links = payload.target.len(),
            expires_at = payload.expires_at,
            "Decoded resolution token"
        );

        if payload.is_expired_at(now_ms) {
            return Err(Error::TokenExpired {
                expired_at_ms: payload.expires_at,
                now_ms,
            });
        }

        Ok(payload)
    }

    /// Resolve one file entry; the entry is returned exactly as the provider sent it
    pub async fn resolve(&self, params: &ResolveParams) -> Result<serde_json::Value> {
        let now_ms = now_millis();
        let payload = self.admit(&params.data, now_ms)?;

        let link = payload
            .target
            .get(params.link)
            .ok_or_else(|| Error::InvalidParameter {
                name: "link".to_string(),
                message: format!(
                    "token carries {} link(s), position {} requested",
                    payload.target.len(),
                    params.link
                ),
            })?;
        let share_url = self.allow_list.validate(link)?;

        if let Some(guard) = &self.replay_guard {
            guard.check_and_consume(&payload, params.link, now_ms)?;
        }

        debug!(share_url = %share_url, index = params.index, "Resolving share link");

        let listing = self.provider.fetch_listing(&share_url).await?;
        listing.select(params.index)
    }
}
