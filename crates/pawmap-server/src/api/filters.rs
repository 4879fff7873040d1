use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json,
};
use pawmap_core::FilterOptions;
use serde::Serialize;

use crate::middleware::RequestId;

use super::locations::{parse_filters, LocationQuery};
use super::{ApiError, ApiResponse, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct FilterDescription {
    pub filters: FilterOptions,
    pub active_count: usize,
}

/// Echo back the filters the server derived from the query string.
pub(super) async fn describe_filters(
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<FilterDescription>>, ApiError> {
    let (_, filters) = parse_filters(&req_id, query)?;
    let active_count = filters.active_count();

    Ok(Json(ApiResponse {
        data: FilterDescription {
            filters,
            active_count,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
