use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates a CORS layer with common settings for API services.
///
/// The returned layer allows the given origins, the methods the API exposes
/// (GET, POST, PUT, DELETE, OPTIONS), `Content-Type` and `Accept` request
/// headers, and caches preflight results for one hour.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::put};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/stock", put(|| async { "ok" }))
            .layer(create_cors_layer(vec![HeaderValue::from_static(
                "https://shop.example",
            )]))
    }

    fn preflight(origin: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/stock")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_preflight_from_listed_origin_is_allowed() {
        let response = app().oneshot(preflight("https://shop.example")).await.unwrap();
        let headers = response.headers();

        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://shop.example"
        );
        assert!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS]
                .to_str()
                .unwrap()
                .contains("PUT")
        );
    }

    #[tokio::test]
    async fn test_unlisted_origin_gets_no_allow_header() {
        let response = app().oneshot(preflight("https://evil.example")).await.unwrap();

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
