//! Common test utilities and helpers
//!
//! A wiremock server plays the provider: a share link that redirects to the
//! canonical page, the page itself, and the listing endpoint.

#![allow(dead_code)]

use std::time::Duration;
use terabox_resolver::config::Settings;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const JS_TOKEN: &str = "A1B2C3D4E5F6";
pub const LOG_ID: &str = "9876543210";
pub const SHORT_URL: &str = "abcDEF123";
pub const SHARE_PATH: &str = "/s/1abcDEF123";

/// Test configuration factory
pub struct TestConfig;

impl TestConfig {
    /// Settings that point the scraper at a mock provider
    pub fn for_provider(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.token.secret = SECRET.to_string();
        settings.logging.level = "debug".to_string();
        settings.network.connect_timeout = Duration::from_secs(2);
        settings.network.request_timeout = Duration::from_secs(5);
        settings.provider.list_endpoint = format!("{}/share/list", server.uri());
        settings.provider.allowed_hosts = vec!["127.0.0.1".to_string()];
        settings
    }

    /// Same, with replay protection switched off
    pub fn reusable(server: &MockServer) -> Settings {
        let mut settings = Self::for_provider(server);
        settings.token.single_use = false;
        settings
    }
}

/// Test data factory
pub struct MockData;

impl MockData {
    /// Share page carrying both embedded values
    pub fn share_page() -> String {
        format!(
            concat!(
                "<html><head><script>",
                "var templateData = decodeURIComponent(\"%7B%22jsToken%22%3A%22",
                "function%20fn%28%22{}%22%29%22%7D\");",
                "var statUrl = \"/api/stat?dp-logid={}&bdstoken=\";",
                "</script></head><body></body></html>"
            ),
            JS_TOKEN, LOG_ID
        )
    }

    /// Share page after a markup change: no js token
    pub fn share_page_without_token() -> String {
        format!(
            "<html><script>var statUrl = \"/api/stat?dp-logid={}&x=1\";</script></html>",
            LOG_ID
        )
    }

    pub fn file_entry(name: &str, size: u64) -> serde_json::Value {
        serde_json::json!({
            "server_filename": name,
            "size": size,
            "server_ctime": 1_700_000_000,
            "dlink": format!("https://d.terabox.com/file/{}", name),
            "thumbs": { "url1": format!("https://t.terabox.com/{}.jpg", name) },
            "fs_id": 123456789,
            "isdir": 0,
        })
    }

    pub fn listing() -> serde_json::Value {
        serde_json::json!({
            "errno": 0,
            "list": [
                Self::file_entry("first.mp4", 10_485_760),
                Self::file_entry("second.mkv", 2048),
            ],
        })
    }

    pub fn share_url(server: &MockServer) -> String {
        format!("{}{}", server.uri(), SHARE_PATH)
    }
}

/// Mock server factory
pub struct MockServerFactory;

impl MockServerFactory {
    /// Provider that answers both steps successfully
    pub async fn provider() -> MockServer {
        let server = MockServer::start().await;
        Self::mount_share_page(&server, MockData::share_page()).await;
        Self::mount_listing(&server, MockData::listing()).await;
        server
    }

    /// Redirect from the share link and the canonical page it lands on
    pub async fn mount_share_page(server: &MockServer, html: String) {
        Mock::given(method("GET"))
            .and(path(SHARE_PATH))
            .respond_with(ResponseTemplate::new(302).insert_header(
                "Location",
                format!("{}/sharing/link?surl={}", server.uri(), SHORT_URL).as_str(),
            ))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/sharing/link"))
            .and(query_param("surl", SHORT_URL))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(server)
            .await;
    }

    /// Listing endpoint that only answers when the scraped values are forwarded
    pub async fn mount_listing(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/share/list"))
            .and(query_param("jsToken", JS_TOKEN))
            .and(query_param("dplogid", LOG_ID))
            .and(query_param("shorturl", SHORT_URL))
            .and(query_param("page", "1"))
            .and(query_param("root", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    /// Share page that answers only after `delay`
    pub async fn slow_provider(delay: Duration) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SHARE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(MockData::share_page())
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
        server
    }
}

/// Test utilities
pub struct TestUtils;

impl TestUtils {
    /// Initialize test logging
    pub fn init_logger() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .try_init();
    }
}
