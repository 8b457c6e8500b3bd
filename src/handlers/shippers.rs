use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::services::loads::{LoadFilters, LoadListResponse};
use crate::services::shippers::{CreateShipperRequest, ShipperListResponse, ShipperResponse};
use crate::{errors::ServiceError, ApiResponse, AppState, ListQuery};

#[utoipa::path(
    post,
    path = "/api/v1/shippers",
    tag = "shippers",
    request_body = CreateShipperRequest,
    responses(
        (status = 201, description = "Shipper created", body = ShipperResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    )
)]
pub async fn create_shipper(
    State(state): State<AppState>,
    Json(payload): Json<CreateShipperRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShipperResponse>>), ServiceError> {
    let shipper = state.services.shippers.create_shipper(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(shipper))))
}

#[utoipa::path(
    get,
    path = "/api/v1/shippers",
    tag = "shippers",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of shippers", body = ShipperListResponse)
    )
)]
pub async fn list_shippers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<ShipperListResponse>>, ServiceError> {
    let limit = query.limit.min(state.config.api_max_page_size);
    let shippers = state
        .services
        .shippers
        .list_shippers(query.page, limit)
        .await?;
    Ok(Json(ApiResponse::success(shippers)))
}

#[utoipa::path(
    get,
    path = "/api/v1/shippers/{id}",
    tag = "shippers",
    params(("id" = Uuid, Path, description = "Shipper ID")),
    responses(
        (status = 200, description = "The shipper", body = ShipperResponse),
        (status = 404, description = "No shipper with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_shipper(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ShipperResponse>>, ServiceError> {
    let shipper = state
        .services
        .shippers
        .get_shipper(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Shipper with ID {} not found", id)))?;
    Ok(Json(ApiResponse::success(shipper)))
}

#[utoipa::path(
    get,
    path = "/api/v1/shippers/{id}/loads",
    tag = "shippers",
    params(
        ("id" = Uuid, Path, description = "Shipper ID"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Page of the shipper's loads", body = LoadListResponse),
        (status = 404, description = "No shipper with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_shipper_loads(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<LoadListResponse>>, ServiceError> {
    // 404 for an unknown shipper rather than an empty page.
    state
        .services
        .shippers
        .get_shipper(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Shipper with ID {} not found", id)))?;

    let filters = LoadFilters {
        shipper_id: Some(id),
        ..Default::default()
    };
    let limit = query.limit.min(state.config.api_max_page_size);
    let loads = state
        .services
        .loads
        .list_loads(filters, query.page, limit)
        .await?;
    Ok(Json(ApiResponse::success(loads)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/shippers/{id}",
    tag = "shippers",
    params(("id" = Uuid, Path, description = "Shipper ID")),
    responses(
        (status = 200, description = "Shipper deleted along with its loads"),
        (status = 404, description = "No shipper with this ID", body = crate::errors::ErrorResponse)
    )
)]
pub async fn delete_shipper(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ServiceError> {
    let loads_removed = state.services.shippers.delete_shipper(id).await?;
    Ok(Json(ApiResponse::success(json!({
        "deleted": true,
        "loads_removed": loads_removed
    }))))
}
