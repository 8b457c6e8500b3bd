mod common;

use axum::http::Method;
use chrono::DateTime;
use serde_json::json;

use common::{hub_payload, response_json, TestApp};

#[tokio::test]
async fn creating_a_hub_defaults_to_active_with_zeroed_scores() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/smart-hubs",
            Some(hub_payload("Dallas South Relay", 32.7, -96.8)),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    let data = &body["data"];
    assert_eq!(data["active"], true);
    assert_eq!(data["efficiency_score"], 0.0);
    assert_eq!(data["network_impact"], 0.0);
    assert_eq!(data["hub_type"], "TRUCK_STOP");
    assert!(data["id"].as_str().is_some());
}

#[tokio::test]
async fn unknown_hub_types_are_rejected() {
    let app = TestApp::new().await;

    let mut payload = hub_payload("Nowhere", 32.7, -96.8);
    payload["hub_type"] = json!("SPACEPORT");

    let response = app
        .request(Method::POST, "/api/v1/smart-hubs", Some(payload))
        .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn score_updates_advance_updated_at() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/smart-hubs",
            Some(hub_payload("Dallas South Relay", 32.7, -96.8)),
        )
        .await;
    let body = response_json(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let updated_before =
        DateTime::parse_from_rfc3339(body["data"]["updated_at"].as_str().unwrap()).unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/smart-hubs/{id}/scores"),
            Some(json!({ "efficiency_score": 87.5, "network_impact": 42.0 })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["efficiency_score"], 87.5);
    let updated_after =
        DateTime::parse_from_rfc3339(body["data"]["updated_at"].as_str().unwrap()).unwrap();
    assert!(updated_after > updated_before);

    // Scores are bounded 0-100.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/smart-hubs/{id}/scores"),
            Some(json!({ "efficiency_score": 250.0, "network_impact": 0.0 })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn deactivation_keeps_the_row() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/smart-hubs",
            Some(hub_payload("Dallas South Relay", 32.7, -96.8)),
        )
        .await;
    let id = response_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/smart-hubs/{id}/deactivate"),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["active"], false);

    // Deactivated, not deleted.
    let response = app
        .request(Method::GET, &format!("/api/v1/smart-hubs/{id}"), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["active"], false);
}

#[tokio::test]
async fn nearby_search_orders_by_distance_and_respects_radius() {
    let app = TestApp::new().await;

    // Around Dallas (32.7767, -96.7970): one close, one farther, one remote.
    for (name, lat, lon) in [
        ("Fort Worth Yard", 32.7555, -97.3308),  // ~31 mi
        ("Dallas Downtown", 32.7800, -96.8000),  // <1 mi
        ("Houston Terminal", 29.7604, -95.3698), // ~225 mi
    ] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/smart-hubs",
                Some(hub_payload(name, lat, lon)),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    let response = app
        .request(
            Method::GET,
            "/api/v1/smart-hubs/nearby?latitude=32.7767&longitude=-96.7970&radius_miles=50",
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let hubs = body["data"].as_array().unwrap();
    assert_eq!(hubs.len(), 2);
    assert_eq!(hubs[0]["name"], "Dallas Downtown");
    assert_eq!(hubs[1]["name"], "Fort Worth Yard");
    assert!(hubs[0]["distance_miles"].as_f64().unwrap() < hubs[1]["distance_miles"].as_f64().unwrap());

    // A deactivated hub disappears from the search.
    let id = hubs[0]["id"].as_str().unwrap().to_string();
    app.request(
        Method::POST,
        &format!("/api/v1/smart-hubs/{id}/deactivate"),
        None,
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/smart-hubs/nearby?latitude=32.7767&longitude=-96.7970&radius_miles=50",
            None,
        )
        .await;
    let body = response_json(response).await;
    let hubs = body["data"].as_array().unwrap();
    assert_eq!(hubs.len(), 1);
    assert_eq!(hubs[0]["name"], "Fort Worth Yard");

    // Bad coordinates are an input error.
    let response = app
        .request(
            Method::GET,
            "/api/v1/smart-hubs/nearby?latitude=120.0&longitude=-96.0&radius_miles=50",
            None,
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn list_filters_narrow_by_type_activity_and_efficiency() {
    let app = TestApp::new().await;

    let mut warehouse = hub_payload("Big Box", 33.0, -97.0);
    warehouse["hub_type"] = json!("WAREHOUSE");
    let response = app
        .request(Method::POST, "/api/v1/smart-hubs", Some(warehouse))
        .await;
    let warehouse_id = response_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    app.request(
        Method::POST,
        "/api/v1/smart-hubs",
        Some(hub_payload("Stop A", 33.1, -97.1)),
    )
    .await;

    app.request(
        Method::PUT,
        &format!("/api/v1/smart-hubs/{warehouse_id}/scores"),
        Some(json!({ "efficiency_score": 90.0, "network_impact": 75.0 })),
    )
    .await;

    let response = app
        .request(Method::GET, "/api/v1/smart-hubs?hub_type=WAREHOUSE", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["hubs"][0]["name"], "Big Box");

    let response = app
        .request(Method::GET, "/api/v1/smart-hubs?min_efficiency=50", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total"], 1);

    let response = app
        .request(Method::GET, "/api/v1/smart-hubs?hub_type=MOON_BASE", None)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn hub_updates_refresh_updated_at_and_fields() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/smart-hubs",
            Some(hub_payload("Old Name", 32.7, -96.8)),
        )
        .await;
    let id = response_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/smart-hubs/{id}"),
            Some(json!({
                "name": "New Name",
                "amenities": ["parking", "fuel", "showers"],
                "operating_hours": { "monday": "06:00-22:00" }
            })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "New Name");
    assert_eq!(body["data"]["amenities"][1], "fuel");
    assert_eq!(body["data"]["operating_hours"]["monday"], "06:00-22:00");
}
