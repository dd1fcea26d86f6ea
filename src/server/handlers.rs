//! HTTP request handlers
//!
//! Implementation of HTTP endpoints for the resolver server.

use crate::{
    Error,
    error::{format_error_for_api, format_error_for_logging},
    server::app::AppState,
    types::{ErrorResponse, PingResponse, ResolveQuery},
    utils::version,
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// HTTP status for a resolution failure
pub fn status_code(error: &Error) -> StatusCode {
    match error {
        Error::MissingParameter { .. }
        | Error::InvalidParameter { .. }
        | Error::Decryption { .. }
        | Error::UpstreamInvalidResponse { .. } => StatusCode::BAD_REQUEST,
        Error::TokenExpired { .. } | Error::TokenReplayed { .. } => StatusCode::UNAUTHORIZED,
        Error::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        Error::UpstreamTransport { .. } | Error::Http(..) => StatusCode::BAD_GATEWAY,
        Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &Error) -> Response {
    let status = status_code(error);
    let details = format_error_for_logging(error);

    if error.is_client_error() {
        tracing::warn!(status = status.as_u16(), details = %details, "Resolution rejected");
    } else {
        tracing::error!(status = status.as_u16(), details = %details, "Resolution failed");
    }

    (status, Json(ErrorResponse::new(format_error_for_api(error)))).into_response()
}

/// Resolve a sealed share link to one file entry
///
/// GET /api?data=<token>&index=<n>[&link=<n>]
///
/// Returns the provider's entry verbatim on success and `{ "error": ... }`
/// otherwise.
pub async fn resolve(
    State(state): State<AppState>,
    query: Result<Query<ResolveQuery>, QueryRejection>,
) -> Response {
    let params = match query
        .map_err(|e| Error::invalid_parameter("query".to_string(), e.body_text()))
        .and_then(|Query(query)| query.validate())
    {
        Ok(params) => params,
        Err(e) => return error_response(&e),
    };

    match state.resolver.resolve(&params).await {
        Ok(entry) => {
            tracing::info!(index = params.index, link = params.link, "Resolved share entry");
            (StatusCode::OK, Json(entry)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Ping endpoint for health checks
///
/// GET /ping
///
/// Returns server status and uptime information.
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let response = PingResponse::new(uptime, version::get_version());

    tracing::debug!(
        "Ping response: uptime={}s, version={}",
        uptime,
        version::get_version()
    );
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Settings,
        provider::ShareProvider,
        resolver::Resolver,
        types::FileListing,
    };
    use axum::{body::Body, http::Request};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;

    const SECRET: &str = "handler-unit-test-secret-0123456789";

    struct StaticProvider(crate::Result<Vec<serde_json::Value>>);

    #[async_trait::async_trait]
    impl ShareProvider for StaticProvider {
        async fn fetch_listing(&self, _share_url: &Url) -> crate::Result<FileListing> {
            match &self.0 {
                Ok(entries) => Ok(FileListing::new(entries.clone())),
                Err(_) => Err(Error::upstream_invalid("js_token", "not found")),
            }
        }
    }

    fn test_app(provider: StaticProvider) -> (axum::Router, Arc<Resolver>) {
        let mut settings = Settings::default();
        settings.token.secret = SECRET.to_string();
        let resolver = Arc::new(Resolver::with_provider(&settings, Arc::new(provider)).unwrap());
        let app = crate::server::app::create_app_with_resolver(settings, resolver.clone());
        (app, resolver)
    }

    fn listing() -> StaticProvider {
        StaticProvider(Ok(vec![json!({
            "server_filename": "clip.mp4",
            "size": 1024,
            "server_ctime": 1_700_000_000,
            "dlink": "https://d.terabox.com/file/clip",
        })]))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[rstest]
    #[case(Error::missing_parameter("data"), StatusCode::BAD_REQUEST)]
    #[case(Error::decryption("tag"), StatusCode::BAD_REQUEST)]
    #[case(Error::upstream_invalid("surl", "none"), StatusCode::BAD_REQUEST)]
    #[case(Error::TokenExpired { expired_at_ms: 0, now_ms: 1 }, StatusCode::UNAUTHORIZED)]
    #[case(Error::TokenReplayed { nonce: "n".into() }, StatusCode::UNAUTHORIZED)]
    #[case(Error::IndexOutOfRange { index: 3, len: 1 }, StatusCode::NOT_FOUND)]
    #[case(Error::upstream_status("share_list", 503), StatusCode::BAD_GATEWAY)]
    #[case(Error::timeout("share_page", 15), StatusCode::GATEWAY_TIMEOUT)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_code_mapping(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(status_code(&error), expected);
    }

    #[tokio::test]
    async fn test_resolve_returns_entry() {
        let (app, resolver) = test_app(listing());
        let token = resolver
            .codec()
            .issue("https://terabox.com/s/abc", 20_000)
            .unwrap();

        let (status, body) = get(app, &format!("/api?data={}&index=0", token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["server_filename"], "clip.mp4");
        assert_eq!(body["size"], 1024);
    }

    #[tokio::test]
    async fn test_resolve_missing_index() {
        let (app, _) = test_app(listing());
        let (status, body) = get(app, "/api?data=abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing data" }));
    }

    #[tokio::test]
    async fn test_resolve_garbage_token() {
        let (app, _) = test_app(listing());
        let (status, body) = get(app, "/api?data=not-a-token&index=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid encrypted data");
    }

    #[tokio::test]
    async fn test_resolve_hides_scrape_stage() {
        let (app, resolver) = test_app(StaticProvider(Err(Error::internal("unused"))));
        let token = resolver
            .codec()
            .issue("https://terabox.com/s/abc", 20_000)
            .unwrap();

        let (status, body) = get(app, &format!("/api?data={}&index=0", token)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid response" }));
    }

    #[tokio::test]
    async fn test_ping_handler() {
        let (app, _) = test_app(listing());
        let (status, body) = get(app, "/ping").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body["version"].as_str().unwrap().is_empty());
        assert!(body["server_uptime"].as_u64().unwrap() < 10);
    }
}
