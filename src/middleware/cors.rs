use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// Browser access is limited to the site origin. An origin that is not a valid
/// header value admits no cross-origin callers at all.
pub fn site_cors(site_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-password"),
        ]);
    match HeaderValue::from_str(site_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::error!(origin = site_origin, "CORS origin rejected: {}", e);
            layer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn allowed_origin(site_origin: &str, request_origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(site_cors(site_origin));
        let resp = app
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, request_origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn only_the_site_origin_is_allowed() {
        let site = "https://cv.example.com";
        assert_eq!(allowed_origin(site, site).await.as_deref(), Some(site));
        assert_ne!(allowed_origin(site, "https://evil.example").await.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn unusable_origin_never_opens_cors() {
        assert_eq!(allowed_origin("bad\norigin", "https://evil.example").await, None);
    }
}
