use sea_orm_migration::{
    prelude::*,
    sea_orm::{ConnectionTrait, DatabaseBackend, Statement},
};

use crate::ddl;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const HUB_TYPE_VALUES: [&str; 7] = [
    "TRUCK_STOP",
    "DISTRIBUTION_CENTER",
    "REST_AREA",
    "WAREHOUSE",
    "TERMINAL",
    "YARD",
    "OTHER",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        if backend == DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute(Statement::from_string(
                    backend,
                    ddl::create_enum_type("hub_type", &HUB_TYPE_VALUES),
                ))
                .await?;
        }

        let mut id = ColumnDef::new(SmartHubs::Id);
        id.uuid().not_null().primary_key();
        if backend == DatabaseBackend::Postgres {
            id.default(Expr::cust("gen_random_uuid()"));
        }

        let mut hub_type = ColumnDef::new(SmartHubs::HubType);
        if backend == DatabaseBackend::Postgres {
            hub_type.custom(Alias::new("hub_type"));
        } else {
            hub_type.string_len(32);
        }
        hub_type.not_null();

        manager
            .create_table(
                Table::create()
                    .table(SmartHubs::Table)
                    .if_not_exists()
                    .col(id)
                    .col(ColumnDef::new(SmartHubs::Name).string().not_null())
                    .col(hub_type)
                    .col(ColumnDef::new(SmartHubs::Latitude).double().not_null())
                    .col(ColumnDef::new(SmartHubs::Longitude).double().not_null())
                    .col(ColumnDef::new(SmartHubs::Address).string().not_null())
                    .col(ColumnDef::new(SmartHubs::City).string().not_null())
                    .col(ColumnDef::new(SmartHubs::State).string().not_null())
                    .col(ColumnDef::new(SmartHubs::Zip).string().not_null())
                    .col(ColumnDef::new(SmartHubs::Amenities).json().null())
                    .col(
                        ColumnDef::new(SmartHubs::Capacity)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(SmartHubs::Capacity).gte(0)),
                    )
                    .col(ColumnDef::new(SmartHubs::OperatingHours).json().null())
                    .col(
                        ColumnDef::new(SmartHubs::EfficiencyScore)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SmartHubs::NetworkImpact)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SmartHubs::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SmartHubs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SmartHubs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite position index backs the nearby bounding-box prefilter.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_smart_hubs_position")
                    .table(SmartHubs::Table)
                    .col(SmartHubs::Latitude)
                    .col(SmartHubs::Longitude)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_smart_hubs_hub_type")
                    .table(SmartHubs::Table)
                    .col(SmartHubs::HubType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_smart_hubs_efficiency_score")
                    .table(SmartHubs::Table)
                    .col(SmartHubs::EfficiencyScore)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_smart_hubs_active")
                    .table(SmartHubs::Table)
                    .col(SmartHubs::Active)
                    .to_owned(),
            )
            .await?;

        // Same touch behavior as the loads trigger, behind its own function
        // so either table's down step can remove its pair independently.
        if backend == DatabaseBackend::Postgres {
            let conn = manager.get_connection();
            conn.execute(Statement::from_string(
                backend,
                ddl::create_touch_function("smart_hubs"),
            ))
            .await?;
            conn.execute(Statement::from_string(
                backend,
                ddl::create_touch_trigger("smart_hubs"),
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
                ddl::drop_touch_trigger("smart_hubs"),
            ))
            .await?;
            conn.execute(Statement::from_string(
                backend,
                ddl::drop_touch_function("smart_hubs"),
            ))
            .await?;
        }

        // hub_type stays behind with the other shared enumerated types.
        manager
            .drop_table(Table::drop().table(SmartHubs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SmartHubs {
    Table,
    Id,
    Name,
    HubType,
    Latitude,
    Longitude,
    Address,
    City,
    State,
    Zip,
    Amenities,
    Capacity,
    OperatingHours,
    EfficiencyScore,
    NetworkImpact,
    Active,
    CreatedAt,
    UpdatedAt,
}
