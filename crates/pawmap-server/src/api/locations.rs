use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use pawmap_core::{evaluate, FilterOptions, LeashRule, LocationRecord, SizePreference};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Filter predicates as query parameters.
///
/// Facility parameters set to `false` impose no constraint, the same as
/// leaving them out. `leash_required=false` on the other hand asks for
/// locations where a leash is explicitly optional.
#[derive(Debug, Default, Deserialize)]
pub(super) struct LocationQuery {
    pub lighting_required: Option<bool>,
    pub leash_required: Option<bool>,
    pub fenced_area_required: Option<bool>,
    pub waste_stations_required: Option<bool>,
    pub water_fountain_required: Option<bool>,
    pub parking_required: Option<bool>,
    pub max_distance: Option<f64>,
    pub preferred_size: Option<SizePreference>,
    pub limit: Option<usize>,
}

impl LocationQuery {
    pub(super) fn to_filters(&self) -> Result<FilterOptions, String> {
        if let Some(km) = self.max_distance {
            if !km.is_finite() || km < 0.0 {
                return Err(format!(
                    "max_distance must be a non-negative number, got {km}"
                ));
            }
        }

        let mut filters = FilterOptions {
            lighting_required: self.lighting_required.unwrap_or(false),
            leash_required: self.leash_required.map(LeashRule::from),
            fenced_area_required: self.fenced_area_required.unwrap_or(false),
            waste_stations_required: self.waste_stations_required.unwrap_or(false),
            water_fountain_required: self.water_fountain_required.unwrap_or(false),
            parking_required: self.parking_required.unwrap_or(false),
            max_distance: self.max_distance,
            preferred_size: None,
        };
        if let Some(size) = self.preferred_size {
            filters.set_preferred_size(size);
        }
        Ok(filters)
    }
}

/// Resolve the query extractor result into filters, mapping every failure to
/// a `bad_request` envelope.
pub(super) fn parse_filters(
    req_id: &RequestId,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<(LocationQuery, FilterOptions), ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected location query");
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;
    let filters = query
        .to_filters()
        .map_err(|reason| ApiError::new(req_id.0.clone(), "bad_request", reason))?;
    Ok((query, filters))
}

#[derive(Debug, Serialize)]
pub(super) struct LocationList {
    pub items: Vec<LocationRecord>,
    /// Number of matching locations before `limit` was applied.
    pub total: usize,
}

pub(super) async fn list_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<LocationList>>, ApiError> {
    let (query, filters) = parse_filters(&req_id, query)?;
    let limit = state.config.normalize_limit(query.limit);

    let mut items = evaluate(&filters, &state.locations.locations);
    let total = items.len();
    items.truncate(limit);

    tracing::debug!(
        request_id = %req_id.0,
        active_filters = filters.active_count(),
        total,
        returned = items.len(),
        "listed locations"
    );

    Ok(Json(ApiResponse {
        data: LocationList { items, total },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LocationRecord>>, ApiError> {
    let location = state.locations.find(&id).cloned().ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("location '{id}' not found"),
        )
    })?;

    Ok(Json(ApiResponse {
        data: location,
        meta: ResponseMeta::new(req_id.0),
    }))
}
