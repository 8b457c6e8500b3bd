use crate::{
    db::DbPool,
    entities::load::{self, ActiveModel as LoadActiveModel, Entity as LoadEntity, Model as LoadModel},
    errors::ServiceError,
    events::{Event, EventSender},
    models::load::{Dimensions, EquipmentType, LoadStatus, TemperatureRequirements},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request/response types for the load service
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLoadRequest {
    pub shipper_id: Uuid,
    #[validate(length(
        min = 1,
        max = 64,
        message = "Reference number must be between 1 and 64 characters"
    ))]
    pub reference_number: String,
    pub description: Option<String>,
    pub equipment_type: EquipmentType,
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: f64,
    #[validate]
    pub dimensions: Dimensions,
    pub volume: Option<f64>,
    pub pallets: Option<i32>,
    pub commodity: Option<String>,
    /// Omitted in the normal flow; a load starts out as CREATED.
    pub status: Option<LoadStatus>,
    pub pickup_earliest: DateTime<Utc>,
    pub pickup_latest: DateTime<Utc>,
    pub delivery_earliest: DateTime<Utc>,
    pub delivery_latest: DateTime<Utc>,
    pub offered_rate: Option<Decimal>,
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub is_hazardous: bool,
    #[validate]
    pub temperature_requirements: Option<TemperatureRequirements>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateLoadRequest {
    pub description: Option<String>,
    pub equipment_type: Option<EquipmentType>,
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: Option<f64>,
    #[validate]
    pub dimensions: Option<Dimensions>,
    pub volume: Option<f64>,
    pub pallets: Option<i32>,
    pub commodity: Option<String>,
    pub pickup_earliest: Option<DateTime<Utc>>,
    pub pickup_latest: Option<DateTime<Utc>>,
    pub delivery_earliest: Option<DateTime<Utc>>,
    pub delivery_latest: Option<DateTime<Utc>>,
    pub offered_rate: Option<Decimal>,
    pub special_instructions: Option<String>,
    pub is_hazardous: Option<bool>,
    #[validate]
    pub temperature_requirements: Option<TemperatureRequirements>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateLoadStatusRequest {
    /// One of the 17 load statuses, exact spelling (e.g. "IN_TRANSIT").
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoadFilters {
    pub shipper_id: Option<Uuid>,
    pub status: Option<LoadStatus>,
    pub equipment_type: Option<EquipmentType>,
    pub pickup_from: Option<DateTime<Utc>>,
    pub pickup_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoadResponse {
    pub id: Uuid,
    pub shipper_id: Uuid,
    pub reference_number: String,
    pub description: Option<String>,
    pub equipment_type: EquipmentType,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub volume: Option<f64>,
    pub pallets: Option<i32>,
    pub commodity: Option<String>,
    pub status: LoadStatus,
    pub pickup_earliest: DateTime<Utc>,
    pub pickup_latest: DateTime<Utc>,
    pub delivery_earliest: DateTime<Utc>,
    pub delivery_latest: DateTime<Utc>,
    pub offered_rate: Option<Decimal>,
    pub special_instructions: Option<String>,
    pub is_hazardous: bool,
    pub temperature_requirements: Option<TemperatureRequirements>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LoadModel> for LoadResponse {
    fn from(model: LoadModel) -> Self {
        Self {
            id: model.id,
            shipper_id: model.shipper_id,
            reference_number: model.reference_number,
            description: model.description,
            equipment_type: model.equipment_type,
            weight: model.weight,
            dimensions: model.dimensions,
            volume: model.volume,
            pallets: model.pallets,
            commodity: model.commodity,
            status: model.status,
            pickup_earliest: model.pickup_earliest,
            pickup_latest: model.pickup_latest,
            delivery_earliest: model.delivery_earliest,
            delivery_latest: model.delivery_latest,
            offered_rate: model.offered_rate,
            special_instructions: model.special_instructions,
            is_hazardous: model.is_hazardous,
            temperature_requirements: model.temperature_requirements,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoadListResponse {
    pub loads: Vec<LoadResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Maps storage-level constraint violations on insert to caller errors.
fn map_insert_err(e: sea_orm::DbErr, reference_number: &str) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(format!(
            "Load with reference number {} already exists",
            reference_number
        )),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ServiceError::InvalidInput("Referenced shipper does not exist".to_string())
        }
        _ => ServiceError::DatabaseError(e),
    }
}

/// Service for managing loads.
#[derive(Clone)]
pub struct LoadService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl LoadService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new load. The status defaults to CREATED when the caller
    /// does not supply one.
    #[instrument(skip(self, request), fields(shipper_id = %request.shipper_id, reference_number = %request.reference_number))]
    pub async fn create_load(
        &self,
        request: CreateLoadRequest,
    ) -> Result<LoadResponse, ServiceError> {
        request.validate()?;

        // Inverted windows are stored as given; the schema never rejected
        // them and callers depend on that.
        if request.pickup_latest < request.pickup_earliest {
            warn!(reference_number = %request.reference_number, "Pickup window is inverted; storing as given");
        }
        if request.delivery_latest < request.delivery_earliest {
            warn!(reference_number = %request.reference_number, "Delivery window is inverted; storing as given");
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let load_id = Uuid::new_v4();
        let reference_number = request.reference_number.clone();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for load creation");
            ServiceError::DatabaseError(e)
        })?;

        let load_active_model = LoadActiveModel {
            id: Set(load_id),
            shipper_id: Set(request.shipper_id),
            reference_number: Set(request.reference_number),
            description: Set(request.description),
            equipment_type: Set(request.equipment_type),
            weight: Set(request.weight),
            dimensions: Set(request.dimensions),
            volume: Set(request.volume),
            pallets: Set(request.pallets),
            commodity: Set(request.commodity),
            status: Set(request.status.unwrap_or(LoadStatus::Created)),
            pickup_earliest: Set(request.pickup_earliest),
            pickup_latest: Set(request.pickup_latest),
            delivery_earliest: Set(request.delivery_earliest),
            delivery_latest: Set(request.delivery_latest),
            offered_rate: Set(request.offered_rate),
            special_instructions: Set(request.special_instructions),
            is_hazardous: Set(request.is_hazardous),
            temperature_requirements: Set(request.temperature_requirements),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let load_model = load_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, load_id = %load_id, "Failed to create load in database");
            map_insert_err(e, &reference_number)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, load_id = %load_id, "Failed to commit load creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(load_id = %load_id, reference_number = %reference_number, "Load created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::LoadCreated(load_id)).await {
                warn!(error = %e, load_id = %load_id, "Failed to send load created event");
            }
        }

        Ok(load_model.into())
    }

    /// Retrieves a load by ID
    #[instrument(skip(self), fields(load_id = %load_id))]
    pub async fn get_load(&self, load_id: Uuid) -> Result<Option<LoadResponse>, ServiceError> {
        let load = LoadEntity::find_by_id(load_id).one(&*self.db_pool).await?;
        Ok(load.map(Into::into))
    }

    /// Retrieves a load by its shipper-supplied reference number
    #[instrument(skip(self), fields(reference_number = %reference_number))]
    pub async fn get_load_by_reference(
        &self,
        reference_number: &str,
    ) -> Result<Option<LoadResponse>, ServiceError> {
        let load = LoadEntity::find()
            .filter(load::Column::ReferenceNumber.eq(reference_number))
            .one(&*self.db_pool)
            .await?;
        Ok(load.map(Into::into))
    }

    /// Lists loads with optional filters and pagination
    #[instrument(skip(self, filters))]
    pub async fn list_loads(
        &self,
        filters: LoadFilters,
        page: u64,
        per_page: u64,
    ) -> Result<LoadListResponse, ServiceError> {
        let page = page.max(1);
        let mut query = LoadEntity::find();

        if let Some(shipper_id) = filters.shipper_id {
            query = query.filter(load::Column::ShipperId.eq(shipper_id));
        }
        if let Some(status) = filters.status {
            query = query.filter(load::Column::Status.eq(status));
        }
        if let Some(equipment_type) = filters.equipment_type {
            query = query.filter(load::Column::EquipmentType.eq(equipment_type));
        }
        if let Some(pickup_from) = filters.pickup_from {
            query = query.filter(load::Column::PickupEarliest.gte(pickup_from));
        }
        if let Some(pickup_to) = filters.pickup_to {
            query = query.filter(load::Column::PickupEarliest.lte(pickup_to));
        }

        let paginator = query
            .order_by_desc(load::Column::CreatedAt)
            .paginate(&*self.db_pool, per_page);

        let total = paginator.num_items().await?;
        let loads = paginator.fetch_page(page - 1).await?;

        Ok(LoadListResponse {
            loads: loads.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Applies a partial update to a load. `updated_at` is always refreshed
    /// server-side; on Postgres the row trigger enforces the same thing for
    /// any writer that bypasses this service.
    #[instrument(skip(self, request), fields(load_id = %load_id))]
    pub async fn update_load(
        &self,
        load_id: Uuid,
        request: UpdateLoadRequest,
    ) -> Result<LoadResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, load_id = %load_id, "Failed to start transaction for load update");
            ServiceError::DatabaseError(e)
        })?;

        let load = LoadEntity::find_by_id(load_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Load with ID {} not found", load_id)))?;

        let mut active: LoadActiveModel = load.into();

        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(equipment_type) = request.equipment_type {
            active.equipment_type = Set(equipment_type);
        }
        if let Some(weight) = request.weight {
            active.weight = Set(weight);
        }
        if let Some(dimensions) = request.dimensions {
            active.dimensions = Set(dimensions);
        }
        if let Some(volume) = request.volume {
            active.volume = Set(Some(volume));
        }
        if let Some(pallets) = request.pallets {
            active.pallets = Set(Some(pallets));
        }
        if let Some(commodity) = request.commodity {
            active.commodity = Set(Some(commodity));
        }
        if let Some(pickup_earliest) = request.pickup_earliest {
            active.pickup_earliest = Set(pickup_earliest);
        }
        if let Some(pickup_latest) = request.pickup_latest {
            active.pickup_latest = Set(pickup_latest);
        }
        if let Some(delivery_earliest) = request.delivery_earliest {
            active.delivery_earliest = Set(delivery_earliest);
        }
        if let Some(delivery_latest) = request.delivery_latest {
            active.delivery_latest = Set(delivery_latest);
        }
        if let Some(offered_rate) = request.offered_rate {
            active.offered_rate = Set(Some(offered_rate));
        }
        if let Some(special_instructions) = request.special_instructions {
            active.special_instructions = Set(Some(special_instructions));
        }
        if let Some(is_hazardous) = request.is_hazardous {
            active.is_hazardous = Set(is_hazardous);
        }
        if let Some(temperature_requirements) = request.temperature_requirements {
            active.temperature_requirements = Set(Some(temperature_requirements));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, load_id = %load_id, "Failed to update load");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, load_id = %load_id, "Failed to commit load update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(load_id = %load_id, "Load updated");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::LoadUpdated(load_id)).await {
                warn!(error = %e, load_id = %load_id, "Failed to send load updated event");
            }
        }

        Ok(updated.into())
    }

    /// Sets a load's status. Any of the defined statuses may follow any
    /// other; transition rules live with callers, not here or in the schema.
    #[instrument(skip(self, request), fields(load_id = %load_id, new_status = %request.status))]
    pub async fn update_load_status(
        &self,
        load_id: Uuid,
        request: UpdateLoadStatusRequest,
    ) -> Result<LoadResponse, ServiceError> {
        request.validate()?;

        let new_status: LoadStatus = request.status.parse().map_err(|_| {
            ServiceError::InvalidStatus(format!("Unknown load status: {}", request.status))
        })?;

        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, load_id = %load_id, "Failed to start transaction for status update");
            ServiceError::DatabaseError(e)
        })?;

        let load = LoadEntity::find_by_id(load_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Load with ID {} not found", load_id)))?;

        let old_status = load.status;

        let mut active: LoadActiveModel = load.into();
        active.status = Set(new_status);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, load_id = %load_id, "Failed to update load status");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, load_id = %load_id, "Failed to commit status update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(load_id = %load_id, old_status = %old_status, new_status = %new_status, "Load status changed");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::LoadStatusChanged {
                    load_id,
                    old_status: old_status.to_string(),
                    new_status: new_status.to_string(),
                })
                .await
            {
                warn!(error = %e, load_id = %load_id, "Failed to send status changed event");
            }
        }

        Ok(updated.into())
    }

    /// Administrative deletion. Normal business flow never deletes a load.
    #[instrument(skip(self), fields(load_id = %load_id))]
    pub async fn delete_load(&self, load_id: Uuid) -> Result<(), ServiceError> {
        let result = LoadEntity::delete_by_id(load_id)
            .exec(&*self.db_pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Load with ID {} not found",
                load_id
            )));
        }

        info!(load_id = %load_id, "Load deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::LoadDeleted(load_id)).await {
                warn!(error = %e, load_id = %load_id, "Failed to send load deleted event");
            }
        }

        Ok(())
    }
}
