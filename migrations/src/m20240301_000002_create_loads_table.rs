use sea_orm_migration::{
    prelude::*,
    sea_orm::{ConnectionTrait, DatabaseBackend, Statement},
};

use crate::ddl;
use crate::m20240301_000001_create_shippers_table::Shippers;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const LOAD_STATUS_VALUES: [&str; 17] = [
    "CREATED",
    "PENDING",
    "OPTIMIZING",
    "AVAILABLE",
    "RESERVED",
    "ASSIGNED",
    "IN_TRANSIT",
    "AT_PICKUP",
    "LOADED",
    "AT_DROPOFF",
    "DELIVERED",
    "COMPLETED",
    "CANCELLED",
    "EXPIRED",
    "DELAYED",
    "EXCEPTION",
    "RESOLVED",
];

pub const EQUIPMENT_TYPE_VALUES: [&str; 3] = ["DRY_VAN", "REFRIGERATED", "FLATBED"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // Shared enumerated types. Creation is guarded so that re-running the
        // step (or two deploy processes racing on it) does not error.
        if backend == DatabaseBackend::Postgres {
            let conn = manager.get_connection();
            conn.execute(Statement::from_string(
                backend,
                ddl::create_enum_type("load_status", &LOAD_STATUS_VALUES),
            ))
            .await?;
            conn.execute(Statement::from_string(
                backend,
                ddl::create_enum_type("equipment_type", &EQUIPMENT_TYPE_VALUES),
            ))
            .await?;
        }

        let mut id = ColumnDef::new(Loads::Id);
        id.uuid().not_null().primary_key();
        if backend == DatabaseBackend::Postgres {
            id.default(Expr::cust("gen_random_uuid()"));
        }

        // SQLite has no enumerated types; status and equipment degrade to
        // strings there and the fixed value sets are enforced above storage.
        let mut equipment_type = ColumnDef::new(Loads::EquipmentType);
        let mut status = ColumnDef::new(Loads::Status);
        if backend == DatabaseBackend::Postgres {
            equipment_type.custom(Alias::new("equipment_type"));
            status.custom(Alias::new("load_status"));
        } else {
            equipment_type.string_len(32);
            status.string_len(32);
        }
        equipment_type.not_null();
        status.not_null().default("CREATED");

        manager
            .create_table(
                Table::create()
                    .table(Loads::Table)
                    .if_not_exists()
                    .col(id)
                    .col(ColumnDef::new(Loads::ShipperId).uuid().not_null())
                    .col(
                        ColumnDef::new(Loads::ReferenceNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Loads::Description).text().null())
                    .col(equipment_type)
                    .col(ColumnDef::new(Loads::Weight).double().not_null())
                    .col(ColumnDef::new(Loads::Dimensions).json().not_null())
                    .col(ColumnDef::new(Loads::Volume).double().null())
                    .col(ColumnDef::new(Loads::Pallets).integer().null())
                    .col(ColumnDef::new(Loads::Commodity).string().null())
                    .col(status)
                    .col(
                        ColumnDef::new(Loads::PickupEarliest)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Loads::PickupLatest)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Loads::DeliveryEarliest)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Loads::DeliveryLatest)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Loads::OfferedRate).decimal_len(10, 2).null())
                    .col(ColumnDef::new(Loads::SpecialInstructions).text().null())
                    .col(
                        ColumnDef::new(Loads::IsHazardous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Loads::TemperatureRequirements).json().null())
                    .col(
                        ColumnDef::new(Loads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Loads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loads_shipper_id")
                            .from(Loads::Table, Loads::ShipperId)
                            .to(Shippers::Table, Shippers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Filtered-query indexes
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_loads_shipper_id")
                    .table(Loads::Table)
                    .col(Loads::ShipperId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_loads_status")
                    .table(Loads::Table)
                    .col(Loads::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_loads_equipment_type")
                    .table(Loads::Table)
                    .col(Loads::EquipmentType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_loads_pickup_earliest")
                    .table(Loads::Table)
                    .col(Loads::PickupEarliest)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_loads_delivery_earliest")
                    .table(Loads::Table)
                    .col(Loads::DeliveryEarliest)
                    .to_owned(),
            )
            .await?;

        // updated_at is owned by the database, not the caller. SQLite has no
        // triggers here; the service layer carries the same guarantee there.
        if backend == DatabaseBackend::Postgres {
            let conn = manager.get_connection();
            conn.execute(Statement::from_string(
                backend,
                ddl::create_touch_function("loads"),
            ))
            .await?;
            conn.execute(Statement::from_string(
                backend,
                ddl::create_touch_trigger("loads"),
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        if backend == DatabaseBackend::Postgres {
            let conn = manager.get_connection();
            conn.execute(Statement::from_string(
                backend,
                ddl::drop_touch_trigger("loads"),
            ))
            .await?;
            conn.execute(Statement::from_string(
                backend,
                ddl::drop_touch_function("loads"),
            ))
            .await?;
        }

        // load_status and equipment_type stay behind: they are shared types
        // and other tables may still reference them.
        manager
            .drop_table(Table::drop().table(Loads::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Loads {
    Table,
    Id,
    ShipperId,
    ReferenceNumber,
    Description,
    EquipmentType,
    Weight,
    Dimensions,
    Volume,
    Pallets,
    Commodity,
    Status,
    PickupEarliest,
    PickupLatest,
    DeliveryEarliest,
    DeliveryLatest,
    OfferedRate,
    SpecialInstructions,
    IsHazardous,
    TemperatureRequirements,
    CreatedAt,
    UpdatedAt,
}
