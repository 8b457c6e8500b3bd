#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use carrier_portal_api::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

/// Helper harness for spinning up an application state backed by an
/// in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single pooled connection keeps the in-memory database alive and
        // shared for the lifetime of the app.
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Some(Arc::new(event_sender.clone())));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .merge(carrier_portal_api::handlers::health::health_routes())
            .nest("/api/v1", carrier_portal_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Create a shipper and return its id.
    pub async fn seed_shipper(&self, name: &str) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/api/v1/shippers",
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status(), 201, "failed to seed shipper");
        let body = response_json(response).await;
        body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("seeded shipper id")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Read a response body as JSON.
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Baseline load-creation payload: a 48x8.5x9 dry van shipment with a
/// one-day pickup-to-delivery window.
pub fn load_payload(shipper_id: Uuid, reference_number: &str) -> Value {
    json!({
        "shipper_id": shipper_id,
        "reference_number": reference_number,
        "equipment_type": "DRY_VAN",
        "weight": 4500.0,
        "dimensions": { "length": 48, "width": 8.5, "height": 9 },
        "pickup_earliest": "2024-03-01T08:00:00Z",
        "pickup_latest": "2024-03-01T12:00:00Z",
        "delivery_earliest": "2024-03-02T08:00:00Z",
        "delivery_latest": "2024-03-02T17:00:00Z"
    })
}

/// Baseline hub-creation payload at the given coordinates.
pub fn hub_payload(name: &str, latitude: f64, longitude: f64) -> Value {
    json!({
        "name": name,
        "hub_type": "TRUCK_STOP",
        "latitude": latitude,
        "longitude": longitude,
        "address": "100 Relay Rd",
        "city": "Dallas",
        "state": "TX",
        "zip": "75201",
        "capacity": 40
    })
}
