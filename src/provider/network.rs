//! HTTP client construction
//!
//! Every resolution gets its own client and cookie jar, so cookies the
//! provider sets on the share page reach the listing call of the same
//! resolution and nothing else. Timeouts bound each outbound call, and
//! redirects are only followed to hosts on the provider allow-list.

use reqwest::{Client, Proxy, cookie::Jar, redirect::Policy};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::allowlist::HostAllowList;
use crate::{Result, config::Settings};

/// Maximum redirects followed from a share link to its canonical page
const MAX_REDIRECTS: usize = 10;

/// Builds reqwest clients from the network settings
#[derive(Debug, Clone)]
pub struct ClientFactory {
    user_agent: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    proxy_url: Option<String>,
    allow_list: HostAllowList,
}

impl ClientFactory {
    pub fn new(settings: &Settings) -> Result<Self> {
        let proxy_url = settings.get_proxy_url();
        if let Some(proxy) = &proxy_url {
            Proxy::all(proxy).map_err(|e| {
                crate::Error::config("network.proxy", &format!("Invalid proxy URL: {}", e))
            })?;
        }

        Ok(Self {
            user_agent: settings.network.user_agent.clone(),
            connect_timeout: settings.network.connect_timeout,
            request_timeout: settings.network.request_timeout,
            proxy_url,
            allow_list: HostAllowList::from_settings(&settings.provider),
        })
    }

    /// Per-call timeout in whole seconds, for error reporting
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout.as_secs()
    }

    /// Client without cookie state
    pub fn client(&self) -> Result<Client> {
        self.builder()?
            .build()
            .map_err(|e| crate::Error::internal(format!("Failed to create HTTP client: {}", e)))
    }

    /// Client bound to a cookie jar for one provider session
    pub fn session_client(&self, jar: Arc<Jar>) -> Result<Client> {
        self.builder()?
            .cookie_provider(jar)
            .build()
            .map_err(|e| crate::Error::internal(format!("Failed to create HTTP client: {}", e)))
    }

    fn builder(&self) -> Result<reqwest::ClientBuilder> {
        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .redirect(redirect_policy(self.allow_list.clone()));

        // Proxies come from settings only; the environment was already merged there
        match &self.proxy_url {
            Some(proxy_url) => {
                let proxy = Proxy::all(proxy_url).map_err(|e| {
                    crate::Error::config("network.proxy", &format!("Invalid proxy URL: {}", e))
                })?;
                builder = builder.proxy(proxy);
            }
            None => builder = builder.no_proxy(),
        }

        Ok(builder)
    }
}

/// Follow up to [`MAX_REDIRECTS`] hops, each to an allowed provider host
fn redirect_policy(allow_list: HostAllowList) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error(format!("more than {} redirects", MAX_REDIRECTS))
        } else if !matches!(attempt.url().scheme(), "http" | "https")
            || !allow_list.is_allowed(attempt.url())
        {
            let target = attempt.url().host_str().unwrap_or_default().to_string();
            attempt.error(format!("redirect to disallowed host '{}'", target))
        } else {
            attempt.follow()
        }
    })
}

/// Cookie jar seeded with the configured provider cookie for each given URL
///
/// `cookie` may hold several `name=value` pairs separated by `;`.
pub fn seeded_jar(cookie: Option<&str>, urls: &[&Url]) -> Arc<Jar> {
    let jar = Arc::new(Jar::default());

    if let Some(cookie) = cookie {
        for pair in cookie.split(';').map(str::trim).filter(|p| p.contains('=')) {
            let cookie = format!("{}; Path=/", pair);
            for url in urls {
                jar.add_cookie_str(&cookie, url);
            }
        }
    }

    jar
}
