use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::models::load::{EquipmentType, LoadStatus};
use crate::services::loads::{
    CreateLoadRequest, LoadFilters, LoadListResponse, LoadResponse, UpdateLoadRequest,
    UpdateLoadStatusRequest,
};
use crate::{errors::ServiceError, ApiResponse, AppState};

/// Query parameters for the load list endpoint. Status and equipment type
/// use the exact database spelling (e.g. "IN_TRANSIT", "DRY_VAN").
#[derive(Debug, Deserialize, IntoParams)]
pub struct LoadListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub shipper_id: Option<Uuid>,
    pub status: Option<String>,
    pub equipment_type: Option<String>,
    pub pickup_from: Option<DateTime<Utc>>,
    pub pickup_to: Option<DateTime<Utc>>,
}

fn parse_filters(params: &LoadListParams) -> Result<LoadFilters, ServiceError> {
    let status = params
        .status
        .as_deref()
        .map(|s| {
            s.parse::<LoadStatus>()
                .map_err(|_| ServiceError::InvalidStatus(format!("Unknown load status: {}", s)))
        })
        .transpose()?;

    let equipment_type = params
        .equipment_type
        .as_deref()
        .map(|s| {
            s.parse::<EquipmentType>()
                .map_err(|_| ServiceError::InvalidInput(format!("Unknown equipment type: {}", s)))
        })
        .transpose()?;

    Ok(LoadFilters {
        shipper_id: params.shipper_id,
        status,
        equipment_type,
        pickup_from: params.pickup_from,
        pickup_to: params.pickup_to,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/loads",
    tag = "loads",
    request_body = CreateLoadRequest,
    responses(
        (status = 201, description = "Load created; status defaults to CREATED", body = LoadResponse),
        (status = 400, description = "Invalid payload or unknown shipper", body = crate::errors::ErrorResponse),
        (status = 409, description = "Reference number already exists", body = crate::errors::ErrorResponse)
    )
)]
pub async fn create_load(
    State(state): State<AppState>,
    Json(payload): Json<CreateLoadRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoadResponse>>), ServiceError> {
    let load = state.services.loads.create_load(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(load))))
}

#[utoipa::path(
    get,
    path = "/api/v1/loads",
    tag = "loads",
    params(LoadListParams),
    responses(
        (status = 200, description = "Filtered page of loads", body = LoadListResponse),
        (status = 400, description = "Unknown status or equipment type filter", body = crate::errors::ErrorResponse)
    )
)]
pub async fn list_loads(
    State(state): State<AppState>,
    Query(params): Query<LoadListParams>,
) -> Result<Json<ApiResponse<LoadListResponse>>, ServiceError> {
    let filters = parse_filters(&params)?;
    let page = params.page.unwrap_or(1);
    let limit = params
        .limit
        .unwrap_or(state.config.api_default_page_size)
        .min(state.config.api_max_page_size);

    let loads = state.services.loads.list_loads(filters, page, limit).await?;
    Ok(Json(ApiResponse::success(loads)))
}

#[utoipa::path(
    get,
    path = "/api/v1/loads/{id}",
    tag = "loads",
    params(("id" = Uuid, Path, description = "Load ID")),
    responses(
        (status = 200, description = "The load", body = LoadResponse),
        (status = 404, description = "No load with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LoadResponse>>, ServiceError> {
    let load = state
        .services
        .loads
        .get_load(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Load with ID {} not found", id)))?;
    Ok(Json(ApiResponse::success(load)))
}

#[utoipa::path(
    get,
    path = "/api/v1/loads/by-reference/{reference_number}",
    tag = "loads",
    params(("reference_number" = String, Path, description = "Shipper-supplied reference number")),
    responses(
        (status = 200, description = "The load", body = LoadResponse),
        (status = 404, description = "No load with this reference number", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_load_by_reference(
    State(state): State<AppState>,
    Path(reference_number): Path<String>,
) -> Result<Json<ApiResponse<LoadResponse>>, ServiceError> {
    let load = state
        .services
        .loads
        .get_load_by_reference(&reference_number)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Load with reference number {} not found",
                reference_number
            ))
        })?;
    Ok(Json(ApiResponse::success(load)))
}

#[utoipa::path(
    put,
    path = "/api/v1/loads/{id}",
    tag = "loads",
    params(("id" = Uuid, Path, description = "Load ID")),
    request_body = UpdateLoadRequest,
    responses(
        (status = 200, description = "Updated load; updated_at is refreshed server-side", body = LoadResponse),
        (status = 404, description = "No load with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn update_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLoadRequest>,
) -> Result<Json<ApiResponse<LoadResponse>>, ServiceError> {
    let load = state.services.loads.update_load(id, payload).await?;
    Ok(Json(ApiResponse::success(load)))
}

#[utoipa::path(
    put,
    path = "/api/v1/loads/{id}/status",
    tag = "loads",
    params(("id" = Uuid, Path, description = "Load ID")),
    request_body = UpdateLoadStatusRequest,
    responses(
        (status = 200, description = "Load with the new status", body = LoadResponse),
        (status = 400, description = "Status outside the defined set", body = crate::errors::ErrorResponse),
        (status = 404, description = "No load with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn update_load_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLoadStatusRequest>,
) -> Result<Json<ApiResponse<LoadResponse>>, ServiceError> {
    let load = state.services.loads.update_load_status(id, payload).await?;
    Ok(Json(ApiResponse::success(load)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/loads/{id}",
    tag = "loads",
    params(("id" = Uuid, Path, description = "Load ID")),
    responses(
        (status = 200, description = "Load deleted"),
        (status = 404, description = "No load with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn delete_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    state.services.loads.delete_load(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": true }))))
}
