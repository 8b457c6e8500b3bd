use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::smart_hub::{Amenities, HubType, OperatingHours};

/// The `smart_hubs` table: strategic relay locations where drivers exchange
/// loads. Hubs are deactivated rather than deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "smart_hubs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    pub hub_type: HubType,

    pub latitude: f64,

    pub longitude: f64,

    pub address: String,

    pub city: String,

    pub state: String,

    pub zip: String,

    #[sea_orm(column_type = "Json", nullable)]
    pub amenities: Option<Amenities>,

    /// Truck count the hub can stage; non-negative.
    pub capacity: i32,

    #[sea_orm(column_type = "Json", nullable)]
    pub operating_hours: Option<OperatingHours>,

    /// 0-100 score recomputed by the optimization process.
    pub efficiency_score: f64,

    /// 0-100 score for the hub's effect on network empty miles.
    pub network_impact: f64,

    pub active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
