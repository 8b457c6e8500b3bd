//! Carrier Portal API Library
//!
//! This crate provides the persistence and HTTP surface for the carrier
//! portal: loads, shippers, and smart hubs.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod request_id;
pub mod services;

use axum::{routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common query parameters for list endpoints
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: request_id::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

// API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    let shippers = Router::new()
        .route(
            "/shippers",
            axum::routing::post(handlers::shippers::create_shipper)
                .get(handlers::shippers::list_shippers),
        )
        .route(
            "/shippers/:id",
            get(handlers::shippers::get_shipper).delete(handlers::shippers::delete_shipper),
        )
        .route("/shippers/:id/loads", get(handlers::shippers::get_shipper_loads));

    let loads = Router::new()
        .route(
            "/loads",
            axum::routing::post(handlers::loads::create_load).get(handlers::loads::list_loads),
        )
        .route(
            "/loads/by-reference/:reference_number",
            get(handlers::loads::get_load_by_reference),
        )
        .route(
            "/loads/:id",
            get(handlers::loads::get_load)
                .put(handlers::loads::update_load)
                .delete(handlers::loads::delete_load),
        )
        .route(
            "/loads/:id/status",
            axum::routing::put(handlers::loads::update_load_status),
        );

    let smart_hubs = Router::new()
        .route(
            "/smart-hubs",
            axum::routing::post(handlers::smart_hubs::create_hub)
                .get(handlers::smart_hubs::list_hubs),
        )
        .route("/smart-hubs/nearby", get(handlers::smart_hubs::nearby_hubs))
        .route(
            "/smart-hubs/:id",
            get(handlers::smart_hubs::get_hub).put(handlers::smart_hubs::update_hub),
        )
        .route(
            "/smart-hubs/:id/scores",
            axum::routing::put(handlers::smart_hubs::update_hub_scores),
        )
        .route(
            "/smart-hubs/:id/deactivate",
            axum::routing::post(handlers::smart_hubs::deactivate_hub),
        );

    Router::new().merge(shippers).merge(loads).merge(smart_hubs)
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response = request_id::scope_request_id(
            request_id::RequestId::new("meta-123"),
            async { ApiResponse::success("ok") },
        )
        .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response = request_id::scope_request_id(
            request_id::RequestId::new("meta-err"),
            async { ApiResponse::<()>::error("oops".into()) },
        )
        .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
    }
}
