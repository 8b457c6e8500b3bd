use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::models::smart_hub::HubType;
use crate::services::smart_hubs::{
    CreateHubRequest, HubFilters, HubListResponse, HubResponse, NearbyHubResponse,
    UpdateHubRequest, UpdateHubScoresRequest,
};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// Query parameters for the hub list endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct HubListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Exact spelling, e.g. "TRUCK_STOP"
    pub hub_type: Option<String>,
    pub active: Option<bool>,
    pub min_efficiency: Option<f64>,
}

/// Query parameters for the nearby search.
#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_miles: f64,
    pub limit: Option<u64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/smart-hubs",
    tag = "smart-hubs",
    request_body = CreateHubRequest,
    responses(
        (status = 201, description = "Hub created, active with zeroed scores", body = HubResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    )
)]
pub async fn create_hub(
    State(state): State<AppState>,
    Json(payload): Json<CreateHubRequest>,
) -> Result<(StatusCode, Json<ApiResponse<HubResponse>>), ServiceError> {
    let hub = state.services.smart_hubs.create_hub(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(hub))))
}

#[utoipa::path(
    get,
    path = "/api/v1/smart-hubs",
    tag = "smart-hubs",
    params(HubListParams),
    responses(
        (status = 200, description = "Filtered page of hubs", body = HubListResponse),
        (status = 400, description = "Unknown hub type filter", body = crate::errors::ErrorResponse)
    )
)]
pub async fn list_hubs(
    State(state): State<AppState>,
    Query(params): Query<HubListParams>,
) -> Result<Json<ApiResponse<HubListResponse>>, ServiceError> {
    let hub_type = params
        .hub_type
        .as_deref()
        .map(|s| {
            s.parse::<HubType>()
                .map_err(|_| ServiceError::InvalidInput(format!("Unknown hub type: {}", s)))
        })
        .transpose()?;

    let filters = HubFilters {
        hub_type,
        active: params.active,
        min_efficiency: params.min_efficiency,
    };
    let page = params.page.unwrap_or(1);
    let limit = params
        .limit
        .unwrap_or(state.config.api_default_page_size)
        .min(state.config.api_max_page_size);

    let hubs = state
        .services
        .smart_hubs
        .list_hubs(filters, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(hubs)))
}

#[utoipa::path(
    get,
    path = "/api/v1/smart-hubs/nearby",
    tag = "smart-hubs",
    params(NearbyParams),
    responses(
        (status = 200, description = "Active hubs within the radius, closest first", body = [NearbyHubResponse]),
        (status = 400, description = "Bad coordinates or radius", body = crate::errors::ErrorResponse)
    )
)]
pub async fn nearby_hubs(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<ApiResponse<Vec<NearbyHubResponse>>>, ServiceError> {
    let limit = params
        .limit
        .unwrap_or(state.config.api_default_page_size)
        .min(state.config.api_max_page_size);
    let hubs = state
        .services
        .smart_hubs
        .find_nearby(params.latitude, params.longitude, params.radius_miles, limit)
        .await?;
    Ok(Json(ApiResponse::success(hubs)))
}

#[utoipa::path(
    get,
    path = "/api/v1/smart-hubs/{id}",
    tag = "smart-hubs",
    params(("id" = Uuid, Path, description = "Hub ID")),
    responses(
        (status = 200, description = "The hub", body = HubResponse),
        (status = 404, description = "No hub with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_hub(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<HubResponse>>, ServiceError> {
    let hub = state
        .services
        .smart_hubs
        .get_hub(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Smart hub with ID {} not found", id)))?;
    Ok(Json(ApiResponse::success(hub)))
}

#[utoipa::path(
    put,
    path = "/api/v1/smart-hubs/{id}",
    tag = "smart-hubs",
    params(("id" = Uuid, Path, description = "Hub ID")),
    request_body = UpdateHubRequest,
    responses(
        (status = 200, description = "Updated hub", body = HubResponse),
        (status = 404, description = "No hub with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn update_hub(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHubRequest>,
) -> Result<Json<ApiResponse<HubResponse>>, ServiceError> {
    let hub = state.services.smart_hubs.update_hub(id, payload).await?;
    Ok(Json(ApiResponse::success(hub)))
}

#[utoipa::path(
    put,
    path = "/api/v1/smart-hubs/{id}/scores",
    tag = "smart-hubs",
    params(("id" = Uuid, Path, description = "Hub ID")),
    request_body = UpdateHubScoresRequest,
    responses(
        (status = 200, description = "Hub with recomputed scores", body = HubResponse),
        (status = 400, description = "Scores outside 0-100", body = crate::errors::ErrorResponse),
        (status = 404, description = "No hub with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn update_hub_scores(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHubScoresRequest>,
) -> Result<Json<ApiResponse<HubResponse>>, ServiceError> {
    let hub = state
        .services
        .smart_hubs
        .update_hub_scores(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(hub)))
}

#[utoipa::path(
    post,
    path = "/api/v1/smart-hubs/{id}/deactivate",
    tag = "smart-hubs",
    params(("id" = Uuid, Path, description = "Hub ID")),
    responses(
        (status = 200, description = "Hub taken out of service; the row is kept", body = HubResponse),
        (status = 404, description = "No hub with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn deactivate_hub(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<HubResponse>>, ServiceError> {
    let hub = state.services.smart_hubs.deactivate_hub(id).await?;
    Ok(Json(ApiResponse::success(hub)))
}
