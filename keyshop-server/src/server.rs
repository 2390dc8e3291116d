//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header::HOST},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .nest("/api", api::router())
        .fallback(host_alias_fallback)
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct NotFoundResponse {
    error: &'static str,
}

/// Unmatched routes: alias hosts get a permanent redirect to the same path
/// on the canonical host, everything else is a 404.
async fn host_alias_fallback(state: State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    // HTTP/2 requests carry the host in `:authority` only.
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()));
    if let Some(host) = host {
        let site = state.config.site.read().await;
        if let Some(target) = site.redirect_target(host) {
            let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
            let location = format!("https://{target}{path_and_query}");
            tracing::debug!(%host, %location, "Redirecting alias host");
            return Redirect::permanent(&location).into_response();
        }
    }

    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse { error: "not found" }),
    )
        .into_response()
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use keyshop_core::config::{
        AddressPoolConfig, PriceApiConfig, ServerConfig, SharedConfig, SiteConfig,
    };
    use keyshop_sdk::objects::{AddressResponse, Chain, MethodInfo, PaymentMethod, Plan};
    use std::time::Duration;
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let config = SharedConfig::new(
            ServerConfig {
                listen: SocketAddr::from(([127, 0, 0, 1], 0)),
            },
            SiteConfig {
                canonical_host: Some("keys.example.com".into()),
                aliases: vec!["www.keys.example.com".into()],
            },
            PriceApiConfig {
                // Nothing listens on port 1.
                base_url: url::Url::parse("http://127.0.0.1:1/api/v3/").unwrap(),
                timeout: Duration::from_secs(2),
            },
        );
        let pools = vec![
            AddressPoolConfig {
                method: PaymentMethod::Btc,
                chain: None,
                addresses: vec!["bc1qone".into(), "bc1qtwo".into()],
            },
            AddressPoolConfig {
                method: PaymentMethod::Usdt,
                chain: Some(Chain::Tron),
                addresses: vec!["TOnlyOne".into()],
            },
        ];
        build_router(AppState::new(config, pools).await)
    }

    async fn get(router: &Router, uri: &str, host: Option<&str>) -> Response {
        let mut req = Request::builder().uri(uri);
        if let Some(host) = host {
            req = req.header(HOST, host);
        }
        router
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(resp: Response) -> T {
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = test_router().await;
        let resp = get(&router, "/health", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_catalog_routes() {
        let router = test_router().await;
        let plans: Vec<Plan> = json(get(&router, "/api/plans", None).await).await;
        assert!(!plans.is_empty());
        let methods: Vec<MethodInfo> = json(get(&router, "/api/methods", None).await).await;
        assert_eq!(methods.len(), PaymentMethod::ALL.len());
    }

    #[tokio::test]
    async fn test_rotating_address_cycles() {
        let router = test_router().await;
        let mut seen = Vec::new();
        for _ in 0..3 {
            let resp: AddressResponse =
                json(get(&router, "/api/address/rotating?method=BTC", None).await).await;
            seen.push(resp.address.unwrap());
        }
        assert_eq!(seen, ["bc1qone", "bc1qtwo", "bc1qone"]);
    }

    #[tokio::test]
    async fn test_random_address_with_chain() {
        let router = test_router().await;
        let resp: AddressResponse =
            json(get(&router, "/api/address/random?method=USDT&chain=tron", None).await).await;
        assert_eq!(resp.address.as_deref(), Some("TOnlyOne"));

        let resp: AddressResponse =
            json(get(&router, "/api/address/random?method=USDT&chain=bsc", None).await).await;
        assert_eq!(resp.address, None);
    }

    #[tokio::test]
    async fn test_address_rejects_unknown_method() {
        let router = test_router().await;
        let resp = get(&router, "/api/address/random?method=DOGE", None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        // Same exact wire names as the config file.
        let resp = get(&router, "/api/address/rotating?method=btc", None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_price_upstream_failure_is_bad_gateway() {
        let router = test_router().await;
        let resp = get(&router, "/api/price?ids=bitcoin", None).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_alias_host_redirects() {
        let router = test_router().await;
        let resp = get(&router, "/pricing?plan=90d", Some("www.keys.example.com")).await;
        assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            resp.headers()["location"],
            "https://keys.example.com/pricing?plan=90d"
        );
    }

    #[tokio::test]
    async fn test_alias_authority_without_host_header_redirects() {
        let router = test_router().await;
        let resp = get(&router, "https://www.keys.example.com/pricing?plan=30d", None).await;
        assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            resp.headers()["location"],
            "https://keys.example.com/pricing?plan=30d"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let router = test_router().await;
        let resp = get(&router, "/pricing", Some("keys.example.com")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = get(&router, "/nope", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
