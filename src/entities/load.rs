use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::load::{Dimensions, EquipmentType, LoadStatus, TemperatureRequirements};

/// The `loads` table: one shipment request from a shipper.
///
/// `updated_at` is owned by the storage layer. On Postgres a BEFORE UPDATE
/// trigger overwrites it on every mutation; on other backends the service
/// layer sets it on every update path. Callers never control it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub shipper_id: Uuid,

    /// Shipper-supplied identifier, unique across all loads.
    #[sea_orm(unique)]
    pub reference_number: String,

    pub description: Option<String>,

    pub equipment_type: EquipmentType,

    /// Pounds.
    pub weight: f64,

    /// Feet; persisted as a JSON document.
    #[sea_orm(column_type = "Json")]
    pub dimensions: Dimensions,

    /// Cubic feet as supplied by the caller; not derived from dimensions.
    pub volume: Option<f64>,

    pub pallets: Option<i32>,

    pub commodity: Option<String>,

    pub status: LoadStatus,

    pub pickup_earliest: DateTime<Utc>,

    pub pickup_latest: DateTime<Utc>,

    pub delivery_earliest: DateTime<Utc>,

    pub delivery_latest: DateTime<Utc>,

    /// Offered rate in dollars, 10 digits / 2 decimal places.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub offered_rate: Option<Decimal>,

    pub special_instructions: Option<String>,

    pub is_hazardous: bool,

    /// Only meaningful for refrigerated equipment, but not coupled to it.
    #[sea_orm(column_type = "Json", nullable)]
    pub temperature_requirements: Option<TemperatureRequirements>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shipper::Entity",
        from = "Column::ShipperId",
        to = "super::shipper::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Shipper,
}

impl Related<super::shipper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipper.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
