mod filters;
mod locations;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use pawmap_core::{AppConfig, LocationsFile};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    /// Candidate locations, loaded once at startup and shared read-only.
    pub locations: Arc<LocationsFile>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    locations: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/locations", get(locations::list_locations))
        .route("/api/v1/locations/{id}", get(locations::get_location))
        .route("/api/v1/filters/describe", get(filters::describe_filters))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            locations: state.locations.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pawmap_core::{Coordinates, Environment, LocationFeatures, LocationRecord, ParkSize};
    use tower::ServiceExt;

    fn make_location(id: &str, edit: impl FnOnce(&mut LocationFeatures)) -> LocationRecord {
        let mut features = LocationFeatures::default();
        edit(&mut features);
        LocationRecord {
            id: id.to_string(),
            name: format!("Park {id}"),
            address: format!("{id} Test St, Brisbane QLD"),
            coordinates: Coordinates {
                lat: -27.47,
                lng: 153.02,
            },
            rating: 4.2,
            review_count: 12,
            photos: vec![],
            description: String::new(),
            hours: None,
            rules: vec![],
            features,
            distance_km: None,
        }
    }

    fn test_state() -> AppState {
        let locations = LocationsFile {
            locations: vec![
                make_location("roma", |f| {
                    f.night_lighting = true;
                    f.leash_required = Some(false);
                    f.fenced_area = true;
                    f.parking = true;
                    f.size = Some(ParkSize::Large);
                }),
                make_location("new-farm", |f| {
                    f.leash_required = Some(true);
                    f.waste_stations = true;
                    f.parking = true;
                    f.size = Some(ParkSize::Medium);
                }),
                make_location("kedron", |f| {
                    f.waste_stations = true;
                    f.size = Some(ParkSize::Large);
                }),
            ],
        };
        let config = AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "debug".to_string(),
            locations_path: "./config/locations.yaml".into(),
            default_limit: 50,
            max_limit: 200,
        };
        AppState {
            locations: Arc::new(locations),
            config: Arc::new(config),
        }
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = build_app(test_state());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    fn item_ids(json: &serde_json::Value) -> Vec<String> {
        json["data"]["items"]
            .as_array()
            .expect("items array")
            .iter()
            .map(|item| item["id"].as_str().expect("id").to_string())
            .collect()
    }

    #[test]
    fn api_error_codes_map_to_status() {
        let not_found = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        let bad = ApiError::new("req-1", "bad_request", "bad").into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        let other = ApiError::new("req-1", "boom", "boom").into_response();
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_location_count() {
        let (status, json) = get_json("/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["locations"], 3);
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
    }

    #[tokio::test]
    async fn list_without_filters_returns_everything_in_order() {
        let (status, json) = get_json("/api/v1/locations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item_ids(&json), vec!["roma", "new-farm", "kedron"]);
        assert_eq!(json["data"]["total"], 3);
    }

    #[tokio::test]
    async fn list_filters_on_parking() {
        let (status, json) = get_json("/api/v1/locations?parking_required=true").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item_ids(&json), vec!["roma", "new-farm"]);
    }

    #[tokio::test]
    async fn false_facility_param_is_no_constraint() {
        let (_, json) = get_json("/api/v1/locations?parking_required=false").await;
        assert_eq!(item_ids(&json), vec!["roma", "new-farm", "kedron"]);
    }

    #[tokio::test]
    async fn leash_false_means_leash_optional() {
        let (_, json) = get_json("/api/v1/locations?leash_required=false").await;
        assert_eq!(item_ids(&json), vec!["roma"]);

        let (_, json) = get_json("/api/v1/locations?leash_required=true").await;
        assert_eq!(item_ids(&json), vec!["new-farm"]);
    }

    #[tokio::test]
    async fn preferred_size_any_is_no_constraint() {
        let (_, json) = get_json("/api/v1/locations?preferred_size=any").await;
        assert_eq!(json["data"]["total"], 3);

        let (_, json) = get_json("/api/v1/locations?preferred_size=large").await;
        assert_eq!(item_ids(&json), vec!["roma", "kedron"]);
    }

    #[tokio::test]
    async fn limit_truncates_but_total_counts_all_matches() {
        let (_, json) = get_json("/api/v1/locations?limit=1").await;
        assert_eq!(item_ids(&json), vec!["roma"]);
        assert_eq!(json["data"]["total"], 3);
    }

    #[tokio::test]
    async fn unknown_size_is_bad_request() {
        let (status, json) = get_json("/api/v1/locations?preferred_size=huge").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn negative_max_distance_is_bad_request() {
        let (status, json) = get_json("/api/v1/locations?max_distance=-2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .expect("message")
            .contains("max_distance"));
    }

    #[tokio::test]
    async fn get_location_returns_record() {
        let (status, json) = get_json("/api/v1/locations/new-farm").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], "new-farm");
        assert_eq!(json["data"]["features"]["leashRequired"], true);
    }

    #[tokio::test]
    async fn get_location_unknown_id_is_404() {
        let (status, json) = get_json("/api/v1/locations/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn describe_filters_normalizes_query() {
        let (status, json) = get_json(
            "/api/v1/filters/describe?parking_required=true&leash_required=false&preferred_size=any&lighting_required=false",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["data"]["filters"],
            serde_json::json!({ "parkingRequired": true, "leashRequired": false })
        );
        assert_eq!(json["data"]["active_count"], 2);
    }
}
