use crate::{
    db::DbPool,
    entities::load::{self, Entity as LoadEntity},
    entities::shipper::{self, ActiveModel as ShipperActiveModel, Entity as ShipperEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateShipperRequest {
    #[validate(length(min = 1, max = 255, message = "Shipper name is required"))]
    pub name: String,
    #[validate(email(message = "Contact email must be a valid email address"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipperResponse {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<shipper::Model> for ShipperResponse {
    fn from(model: shipper::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_email: model.contact_email,
            contact_phone: model.contact_phone,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipperListResponse {
    pub shippers: Vec<ShipperResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service for managing shippers, the owning side of the load relationship.
#[derive(Clone)]
pub struct ShipperService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ShipperService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(shipper_name = %request.name))]
    pub async fn create_shipper(
        &self,
        request: CreateShipperRequest,
    ) -> Result<ShipperResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let shipper_id = Uuid::new_v4();

        let model = ShipperActiveModel {
            id: Set(shipper_id),
            name: Set(request.name),
            contact_email: Set(request.contact_email),
            contact_phone: Set(request.contact_phone),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, shipper_id = %shipper_id, "Failed to create shipper");
            ServiceError::DatabaseError(e)
        })?;

        info!(shipper_id = %shipper_id, "Shipper created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::ShipperCreated(shipper_id)).await {
                warn!(error = %e, shipper_id = %shipper_id, "Failed to send shipper created event");
            }
        }

        Ok(model.into())
    }

    #[instrument(skip(self), fields(shipper_id = %shipper_id))]
    pub async fn get_shipper(
        &self,
        shipper_id: Uuid,
    ) -> Result<Option<ShipperResponse>, ServiceError> {
        let shipper = ShipperEntity::find_by_id(shipper_id)
            .one(&*self.db_pool)
            .await?;
        Ok(shipper.map(Into::into))
    }

    #[instrument(skip(self))]
    pub async fn list_shippers(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<ShipperListResponse, ServiceError> {
        let page = page.max(1);
        let paginator = ShipperEntity::find()
            .order_by_asc(shipper::Column::Name)
            .paginate(&*self.db_pool, per_page);

        let total = paginator.num_items().await?;
        let shippers = paginator.fetch_page(page - 1).await?;

        Ok(ShipperListResponse {
            shippers: shippers.into_iter().map(Into::into).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Deletes a shipper. The foreign key cascades the delete to every load
    /// the shipper owns, and to no others.
    #[instrument(skip(self), fields(shipper_id = %shipper_id))]
    pub async fn delete_shipper(&self, shipper_id: Uuid) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;

        let shipper = ShipperEntity::find_by_id(shipper_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Shipper with ID {} not found", shipper_id))
            })?;

        let load_count = LoadEntity::find()
            .filter(load::Column::ShipperId.eq(shipper_id))
            .count(db)
            .await?;

        shipper.delete(db).await.map_err(|e| {
            error!(error = %e, shipper_id = %shipper_id, "Failed to delete shipper");
            ServiceError::DatabaseError(e)
        })?;

        info!(shipper_id = %shipper_id, loads_removed = load_count, "Shipper deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::ShipperDeleted {
                    shipper_id,
                    loads_removed: load_count,
                })
                .await
            {
                warn!(error = %e, shipper_id = %shipper_id, "Failed to send shipper deleted event");
            }
        }

        Ok(load_count)
    }
}
