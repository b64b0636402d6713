use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::config::SITES_CACHE_CONTROL;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "sites": state.sites.len(),
        "geo_sites": state.geo_count(),
        "loaded_at": state.loaded_at.to_rfc3339(),
    }))
}

/// Serve the pre-serialized site dataset. Nothing is cloned or
/// re-serialized per request.
pub async fn get_sites(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if if_none_match_matches(&headers, &state.sites_etag) {
        return not_modified_response(SITES_CACHE_CONTROL, &state.sites_etag);
    }

    json_bytes_response(
        state.sites_json.clone(),
        SITES_CACHE_CONTROL,
        &state.sites_etag,
        &state.last_modified(),
    )
}

fn json_bytes_response(
    body: Bytes,
    cache_control: &str,
    etag: &str,
    last_modified: &str,
) -> Response {
    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json");
    if let Ok(value) = HeaderValue::from_str(cache_control) {
        response = response.header(header::CACHE_CONTROL, value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        response = response.header(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(last_modified) {
        response = response.header(header::LAST_MODIFIED, value);
    }
    response
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn not_modified_response(cache_control: &str, etag: &str) -> Response {
    let mut response = Response::builder().status(StatusCode::NOT_MODIFIED);
    if let Ok(value) = HeaderValue::from_str(cache_control) {
        response = response.header(header::CACHE_CONTROL, value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        response = response.header(header::ETAG, value);
    }
    response
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::NOT_MODIFIED.into_response())
}

fn normalize_etag(raw: &str) -> &str {
    raw.strip_prefix("W/").unwrap_or(raw)
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::{Request, StatusCode, header};
    use tower::util::ServiceExt;

    use super::{if_none_match_matches, normalize_etag};
    use crate::state::AppState;

    fn test_state() -> AppState {
        let sites = serde_json::from_str(
            r#"[
                { "name": "Minerve", "geo": { "lat": 43.35, "lon": 2.74 }, "period2": true },
                { "name": "Lost charter", "period0": true }
            ]"#,
        )
        .expect("sites json");
        AppState::from_sites(sites)
    }

    #[tokio::test]
    async fn sites_endpoint_serves_payload_with_validators() {
        let state = test_state();
        let etag = state.sites_etag.clone();
        let app = crate::app::build_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/sites")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ETAG).unwrap().to_str().unwrap(),
            etag
        );
        assert!(response.headers().contains_key(header::LAST_MODIFIED));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let sites: Vec<cathar_shared::Site> = serde_json::from_slice(&body).unwrap();
        assert_eq!(sites.len(), 2);
    }

    #[tokio::test]
    async fn sites_endpoint_honors_if_none_match() {
        let state = test_state();
        let etag = state.sites_etag.clone();
        let app = crate::app::build_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/sites")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn health_reports_dataset_counts() {
        let app = crate::app::build_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["sites"], 2);
        assert_eq!(json["geo_sites"], 1);
    }

    #[test]
    fn if_none_match_handles_lists_weak_tags_and_star() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, "\"abc\", W/\"def\"".parse().unwrap());
        assert!(if_none_match_matches(&headers, "W/\"abc\""));
        assert!(if_none_match_matches(&headers, "\"def\""));
        assert!(!if_none_match_matches(&headers, "\"ghi\""));

        headers.insert(header::IF_NONE_MATCH, "*".parse().unwrap());
        assert!(if_none_match_matches(&headers, "\"anything\""));
    }

    #[test]
    fn normalize_strips_weak_prefix_only() {
        assert_eq!(normalize_etag("W/\"x\""), "\"x\"");
        assert_eq!(normalize_etag("\"x\""), "\"x\"");
    }
}
