//! Resolver configuration
//!
//! Settings come from a TOML file, environment variables and command-line
//! overrides. The token secret has no default: it is a deployment secret and
//! must be supplied through the file or `RESOLVER_SECRET`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum accepted length of the shared token secret
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime (one day)
pub const MAX_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Provider hosts accepted when no allow-list is configured
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &[
    "mirrobox.com",
    "nephobox.com",
    "freeterabox.com",
    "1024tera.com",
    "1024tera.co",
    "4funbox.co",
    "4funbox.com",
    "terabox.app",
    "terabox.com",
    "terabox.fun",
    "momerybox.com",
    "teraboxapp.com",
    "tibibox.com",
];

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "::".to_string()
}

fn default_port() -> u16 {
    4416
}

fn default_ttl_ms() -> u64 {
    20_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_list_endpoint() -> String {
    "https://www.1024tera.com/share/list".to_string()
}

fn default_app_id() -> String {
    "250528".to_string()
}

fn default_web() -> String {
    "1".to_string()
}

fn default_channel() -> String {
    "dubox".to_string()
}

fn default_client_type() -> String {
    "0".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_allowed_hosts() -> Vec<String> {
    DEFAULT_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect()
}

fn default_endpoint() -> String {
    "http://127.0.0.1:4416".to_string()
}

fn default_error_display_secs() -> u64 {
    5
}

// Duration serialization module
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Main configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,
    /// Resolution token configuration
    #[serde(default)]
    pub token: TokenSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Outbound network configuration
    #[serde(default)]
    pub network: NetworkSettings,
    /// Provider scrape parameters
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Command-line client configuration
    #[serde(default)]
    pub client: ClientSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable permissive CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

/// Resolution token configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Shared secret for sealing tokens
    #[serde(default)]
    pub secret: String,
    /// Token lifetime in milliseconds
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
    /// Reject a token nonce seen before
    #[serde(default = "default_true")]
    pub single_use: bool,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl_ms", &self.ttl_ms)
            .field("single_use", &self.single_use)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

/// Network and proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// HTTPS proxy URL
    #[serde(default)]
    pub https_proxy: Option<String>,
    /// HTTP proxy URL
    #[serde(default)]
    pub http_proxy: Option<String>,
    /// All protocols proxy URL
    #[serde(default)]
    pub all_proxy: Option<String>,
    /// Connection timeout in seconds
    #[serde(with = "duration_secs", default = "default_connect_timeout")]
    pub connect_timeout: Duration,
    /// Whole-request timeout in seconds, per outbound call
    #[serde(with = "duration_secs", default = "default_request_timeout")]
    pub request_timeout: Duration,
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Provider endpoint and listing parameters
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Share listing endpoint
    #[serde(default = "default_list_endpoint")]
    pub list_endpoint: String,
    /// `app_id` listing parameter
    #[serde(default = "default_app_id")]
    pub app_id: String,
    /// `web` listing parameter
    #[serde(default = "default_web")]
    pub web: String,
    /// `channel` listing parameter
    #[serde(default = "default_channel")]
    pub channel: String,
    /// `clienttype` listing parameter
    #[serde(default = "default_client_type")]
    pub client_type: String,
    /// Entries requested per listing page (`num`)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Session cookie sent to the provider, e.g. `ndus=...`
    #[serde(default)]
    pub cookie: Option<String>,
    /// Hostnames (and their subdomains) accepted as share links
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("list_endpoint", &self.list_endpoint)
            .field("app_id", &self.app_id)
            .field("web", &self.web)
            .field("channel", &self.channel)
            .field("client_type", &self.client_type)
            .field("page_size", &self.page_size)
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .field("allowed_hosts", &self.allowed_hosts)
            .finish()
    }
}

/// Command-line client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the resolution server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Seconds an error banner stays on screen
    #[serde(default = "default_error_display_secs")]
    pub error_display_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_ms: default_ttl_ms(),
            single_use: default_true(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            https_proxy: None,
            http_proxy: None,
            all_proxy: None,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            list_endpoint: default_list_endpoint(),
            app_id: default_app_id(),
            web: default_web(),
            channel: default_channel(),
            client_type: default_client_type(),
            page_size: default_page_size(),
            cookie: None,
            allowed_hosts: default_allowed_hosts(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            error_display_secs: default_error_display_secs(),
        }
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            crate::Error::config("file", &format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Apply environment variable overrides; unset variables leave values alone
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(host) = std::env::var("RESOLVER_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("RESOLVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| crate::Error::config("port", &format!("Invalid port: {}", e)))?;
        }

        if let Ok(secret) = std::env::var("RESOLVER_SECRET") {
            self.token.secret = secret;
        }

        if let Ok(ttl) = std::env::var("RESOLVER_TOKEN_TTL_MS") {
            self.token.ttl_ms = ttl.parse().map_err(|e| {
                crate::Error::config("RESOLVER_TOKEN_TTL_MS", &format!("Invalid TTL: {}", e))
            })?;
        }

        if let Ok(cookie) = std::env::var("RESOLVER_PROVIDER_COOKIE") {
            self.provider.cookie = Some(cookie);
        }

        if let Ok(endpoint) = std::env::var("RESOLVER_ENDPOINT") {
            self.client.endpoint = endpoint;
        }

        if let Ok(proxy) = std::env::var("HTTPS_PROXY") {
            self.network.https_proxy = Some(proxy);
        }
        if let Ok(proxy) = std::env::var("HTTP_PROXY") {
            self.network.http_proxy = Some(proxy);
        }
        if let Ok(proxy) = std::env::var("ALL_PROXY") {
            self.network.all_proxy = Some(proxy);
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Get effective proxy URL based on priority
    pub fn get_proxy_url(&self) -> Option<String> {
        self.network
            .https_proxy
            .as_ref()
            .or(self.network.http_proxy.as_ref())
            .or(self.network.all_proxy.as_ref())
            .cloned()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.port == 0 {
            return Err(crate::Error::config(
                "port",
                "Invalid server port: cannot be 0",
            ));
        }

        if self.token.secret.chars().count() < MIN_SECRET_LEN {
            return Err(crate::Error::config(
                "token.secret",
                &format!(
                    "Token secret must be at least {} characters (set RESOLVER_SECRET)",
                    MIN_SECRET_LEN
                ),
            ));
        }

        if self.token.ttl_ms == 0 {
            return Err(crate::Error::config(
                "token.ttl_ms",
                "Invalid token TTL: cannot be 0",
            ));
        }

        if self.token.ttl_ms > MAX_TTL_MS {
            return Err(crate::Error::config(
                "token.ttl_ms",
                &format!("Invalid token TTL: cannot exceed {} ms", MAX_TTL_MS),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "log_level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        for (name, proxy_url) in [
            ("https_proxy", &self.network.https_proxy),
            ("http_proxy", &self.network.http_proxy),
            ("all_proxy", &self.network.all_proxy),
        ]
        .iter()
        {
            if let Some(url_str) = proxy_url
                && let Err(e) = url::Url::parse(url_str)
            {
                return Err(crate::Error::config(
                    *name,
                    &format!("Invalid proxy URL '{}': {}", url_str, e),
                ));
            }
        }

        if let Err(e) = url::Url::parse(&self.provider.list_endpoint) {
            return Err(crate::Error::config(
                "provider.list_endpoint",
                &format!("Invalid URL '{}': {}", self.provider.list_endpoint, e),
            ));
        }

        if self.provider.allowed_hosts.is_empty() {
            return Err(crate::Error::config(
                "provider.allowed_hosts",
                "At least one provider host is required",
            ));
        }

        Ok(())
    }
}
