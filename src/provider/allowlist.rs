//! Provider hostname allow-list
//!
//! Links are matched on their parsed host: a host is accepted when it equals
//! an allowed name or is a subdomain of one. Matching the raw URL text would
//! let `https://evil.example/?terabox.com` through.

use url::Url;

use crate::{Error, Result, config::settings::ProviderSettings};

/// Set of provider hostnames accepted as share links
#[derive(Debug, Clone)]
pub struct HostAllowList {
    hosts: Vec<String>,
}

impl HostAllowList {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().trim_end_matches('.').to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::new(&settings.allowed_hosts)
    }

    /// True when the URL's host is covered by the list
    pub fn is_allowed(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.trim_end_matches('.').to_ascii_lowercase();

        self.hosts.iter().any(|allowed| {
            host == *allowed
                || (host.len() > allowed.len()
                    && host.ends_with(allowed.as_str())
                    && host.as_bytes()[host.len() - allowed.len() - 1] == b'.')
        })
    }

    /// Parse a submitted link and check scheme and host
    pub fn validate(&self, link: &str) -> Result<Url> {
        let url = Url::parse(link.trim()).map_err(|e| Error::InvalidParameter {
            name: "link".to_string(),
            message: format!("'{}' is not a valid URL: {}", link, e),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidParameter {
                name: "link".to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if !self.is_allowed(&url) {
            return Err(Error::InvalidParameter {
                name: "link".to_string(),
                message: format!(
                    "host '{}' is not a supported provider",
                    url.host_str().unwrap_or_default()
                ),
            });
        }

        Ok(url)
    }
}

impl Default for HostAllowList {
    fn default() -> Self {
        Self::from_settings(&ProviderSettings::default())
    }
}
