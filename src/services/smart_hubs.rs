use crate::{
    db::DbPool,
    entities::smart_hub::{
        self, ActiveModel as SmartHubActiveModel, Entity as SmartHubEntity, Model as SmartHubModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::smart_hub::{Amenities, HubType, OperatingHours},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

const EARTH_RADIUS_MILES: f64 = 3958.8;
const MILES_PER_DEGREE_LAT: f64 = 69.0;

fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1_rad, lon1_rad) = (lat1.to_radians(), lon1.to_radians());
    let (lat2_rad, lon2_rad) = (lat2.to_radians(), lon2.to_radians());
    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;
    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_MILES * c
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateHubRequest {
    #[validate(length(min = 1, max = 255, message = "Hub name is required"))]
    pub name: String,
    pub hub_type: HubType,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "Zip is required"))]
    pub zip: String,
    pub amenities: Option<Amenities>,
    #[validate(range(min = 0, message = "Capacity must not be negative"))]
    #[serde(default)]
    pub capacity: i32,
    pub operating_hours: Option<OperatingHours>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateHubRequest {
    #[validate(length(min = 1, max = 255, message = "Hub name must not be empty"))]
    pub name: Option<String>,
    pub hub_type: Option<HubType>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub amenities: Option<Amenities>,
    #[validate(range(min = 0, message = "Capacity must not be negative"))]
    pub capacity: Option<i32>,
    pub operating_hours: Option<OperatingHours>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateHubScoresRequest {
    #[validate(range(min = 0.0, max = 100.0, message = "Efficiency score must be 0-100"))]
    pub efficiency_score: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Network impact must be 0-100"))]
    pub network_impact: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct HubFilters {
    pub hub_type: Option<HubType>,
    pub active: Option<bool>,
    pub min_efficiency: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HubResponse {
    pub id: Uuid,
    pub name: String,
    pub hub_type: HubType,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub amenities: Option<Amenities>,
    pub capacity: i32,
    pub operating_hours: Option<OperatingHours>,
    pub efficiency_score: f64,
    pub network_impact: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SmartHubModel> for HubResponse {
    fn from(model: SmartHubModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            hub_type: model.hub_type,
            latitude: model.latitude,
            longitude: model.longitude,
            address: model.address,
            city: model.city,
            state: model.state,
            zip: model.zip,
            amenities: model.amenities,
            capacity: model.capacity,
            operating_hours: model.operating_hours,
            efficiency_score: model.efficiency_score,
            network_impact: model.network_impact,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HubListResponse {
    pub hubs: Vec<HubResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// A hub with its distance from the queried position.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NearbyHubResponse {
    pub distance_miles: f64,
    #[serde(flatten)]
    pub hub: HubResponse,
}

/// Service for managing smart hubs.
#[derive(Clone)]
pub struct SmartHubService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl SmartHubService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(hub_name = %request.name))]
    pub async fn create_hub(&self, request: CreateHubRequest) -> Result<HubResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let hub_id = Uuid::new_v4();

        let model = SmartHubActiveModel {
            id: Set(hub_id),
            name: Set(request.name),
            hub_type: Set(request.hub_type),
            latitude: Set(request.latitude),
            longitude: Set(request.longitude),
            address: Set(request.address),
            city: Set(request.city),
            state: Set(request.state),
            zip: Set(request.zip),
            amenities: Set(request.amenities),
            capacity: Set(request.capacity),
            operating_hours: Set(request.operating_hours),
            efficiency_score: Set(0.0),
            network_impact: Set(0.0),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, hub_id = %hub_id, "Failed to create smart hub");
            ServiceError::DatabaseError(e)
        })?;

        info!(hub_id = %hub_id, "Smart hub created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::HubCreated(hub_id)).await {
                warn!(error = %e, hub_id = %hub_id, "Failed to send hub created event");
            }
        }

        Ok(model.into())
    }

    #[instrument(skip(self), fields(hub_id = %hub_id))]
    pub async fn get_hub(&self, hub_id: Uuid) -> Result<Option<HubResponse>, ServiceError> {
        let hub = SmartHubEntity::find_by_id(hub_id).one(&*self.db_pool).await?;
        Ok(hub.map(Into::into))
    }

    #[instrument(skip(self, filters))]
    pub async fn list_hubs(
        &self,
        filters: HubFilters,
        page: u64,
        per_page: u64,
    ) -> Result<HubListResponse, ServiceError> {
        let page = page.max(1);
        let mut query = SmartHubEntity::find();

        if let Some(hub_type) = filters.hub_type {
            query = query.filter(smart_hub::Column::HubType.eq(hub_type));
        }
        if let Some(active) = filters.active {
            query = query.filter(smart_hub::Column::Active.eq(active));
        }
        if let Some(min_efficiency) = filters.min_efficiency {
            query = query.filter(smart_hub::Column::EfficiencyScore.gte(min_efficiency));
        }

        let paginator = query
            .order_by_desc(smart_hub::Column::EfficiencyScore)
            .paginate(&*self.db_pool, per_page);

        let total = paginator.num_items().await?;
        let hubs = paginator.fetch_page(page - 1).await?;

        Ok(HubListResponse {
            hubs: hubs.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Applies a partial update to a hub's descriptive fields.
    #[instrument(skip(self, request), fields(hub_id = %hub_id))]
    pub async fn update_hub(
        &self,
        hub_id: Uuid,
        request: UpdateHubRequest,
    ) -> Result<HubResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, hub_id = %hub_id, "Failed to start transaction for hub update");
            ServiceError::DatabaseError(e)
        })?;

        let hub = SmartHubEntity::find_by_id(hub_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Smart hub with ID {} not found", hub_id))
            })?;

        let mut active: SmartHubActiveModel = hub.into();

        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(hub_type) = request.hub_type {
            active.hub_type = Set(hub_type);
        }
        if let Some(latitude) = request.latitude {
            active.latitude = Set(latitude);
        }
        if let Some(longitude) = request.longitude {
            active.longitude = Set(longitude);
        }
        if let Some(address) = request.address {
            active.address = Set(address);
        }
        if let Some(city) = request.city {
            active.city = Set(city);
        }
        if let Some(state) = request.state {
            active.state = Set(state);
        }
        if let Some(zip) = request.zip {
            active.zip = Set(zip);
        }
        if let Some(amenities) = request.amenities {
            active.amenities = Set(Some(amenities));
        }
        if let Some(capacity) = request.capacity {
            active.capacity = Set(capacity);
        }
        if let Some(operating_hours) = request.operating_hours {
            active.operating_hours = Set(Some(operating_hours));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, hub_id = %hub_id, "Failed to update smart hub");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, hub_id = %hub_id, "Failed to commit hub update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(hub_id = %hub_id, "Smart hub updated");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::HubUpdated(hub_id)).await {
                warn!(error = %e, hub_id = %hub_id, "Failed to send hub updated event");
            }
        }

        Ok(updated.into())
    }

    /// Records recomputed efficiency metrics for a hub.
    #[instrument(skip(self, request), fields(hub_id = %hub_id))]
    pub async fn update_hub_scores(
        &self,
        hub_id: Uuid,
        request: UpdateHubScoresRequest,
    ) -> Result<HubResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let hub = SmartHubEntity::find_by_id(hub_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Smart hub with ID {} not found", hub_id))
            })?;

        let mut active: SmartHubActiveModel = hub.into();
        active.efficiency_score = Set(request.efficiency_score);
        active.network_impact = Set(request.network_impact);
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, hub_id = %hub_id, "Failed to update hub scores");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            hub_id = %hub_id,
            efficiency_score = request.efficiency_score,
            network_impact = request.network_impact,
            "Smart hub scores updated"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::HubScoresUpdated {
                    hub_id,
                    efficiency_score: request.efficiency_score,
                    network_impact: request.network_impact,
                })
                .await
            {
                warn!(error = %e, hub_id = %hub_id, "Failed to send hub scores event");
            }
        }

        Ok(updated.into())
    }

    /// Takes a hub out of service. Hubs are never deleted; the row stays for
    /// historical exchange data.
    #[instrument(skip(self), fields(hub_id = %hub_id))]
    pub async fn deactivate_hub(&self, hub_id: Uuid) -> Result<HubResponse, ServiceError> {
        let db = &*self.db_pool;

        let hub = SmartHubEntity::find_by_id(hub_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Smart hub with ID {} not found", hub_id))
            })?;

        let mut active: SmartHubActiveModel = hub.into();
        active.active = Set(false);
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, hub_id = %hub_id, "Failed to deactivate smart hub");
            ServiceError::DatabaseError(e)
        })?;

        info!(hub_id = %hub_id, "Smart hub deactivated");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::HubDeactivated(hub_id)).await {
                warn!(error = %e, hub_id = %hub_id, "Failed to send hub deactivated event");
            }
        }

        Ok(updated.into())
    }

    /// Finds active hubs within `radius_miles` of a position, closest first.
    /// A bounding-box filter rides the `(latitude, longitude)` index; the
    /// haversine pass trims the box corners.
    #[instrument(skip(self))]
    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
        limit: u64,
    ) -> Result<Vec<NearbyHubResponse>, ServiceError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ServiceError::InvalidInput(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ServiceError::InvalidInput(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }
        if radius_miles <= 0.0 {
            return Err(ServiceError::InvalidInput(
                "Radius must be positive".to_string(),
            ));
        }

        let lat_delta = radius_miles / MILES_PER_DEGREE_LAT;
        let lon_scale = latitude.to_radians().cos().abs().max(0.01);
        let lon_delta = radius_miles / (MILES_PER_DEGREE_LAT * lon_scale);

        let hubs = SmartHubEntity::find()
            .filter(smart_hub::Column::Active.eq(true))
            .filter(
                smart_hub::Column::Latitude.between(latitude - lat_delta, latitude + lat_delta),
            )
            .filter(
                smart_hub::Column::Longitude.between(longitude - lon_delta, longitude + lon_delta),
            )
            .all(&*self.db_pool)
            .await?;

        let mut nearby: Vec<NearbyHubResponse> = hubs
            .into_iter()
            .filter_map(|hub| {
                let distance_miles =
                    haversine_miles(latitude, longitude, hub.latitude, hub.longitude);
                (distance_miles <= radius_miles).then(|| NearbyHubResponse {
                    distance_miles,
                    hub: hub.into(),
                })
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
        nearby.truncate(limit as usize);

        Ok(nearby)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_distance() {
        // Dallas to Fort Worth is roughly 31 miles.
        let d = haversine_miles(32.7767, -96.7970, 32.7555, -97.3308);
        assert!((29.0..33.0).contains(&d), "unexpected distance: {d}");
    }

    #[test]
    fn haversine_is_zero_for_same_point() {
        let d = haversine_miles(40.0, -75.0, 40.0, -75.0);
        assert!(d.abs() < 1e-9);
    }
}
