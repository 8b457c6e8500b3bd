use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut id = ColumnDef::new(Shippers::Id);
        id.uuid().not_null().primary_key();
        if manager.get_database_backend() == DatabaseBackend::Postgres {
            id.default(Expr::cust("gen_random_uuid()"));
        }

        manager
            .create_table(
                Table::create()
                    .table(Shippers::Table)
                    .if_not_exists()
                    .col(id)
                    .col(ColumnDef::new(Shippers::Name).string().not_null())
                    .col(ColumnDef::new(Shippers::ContactEmail).string().null())
                    .col(ColumnDef::new(Shippers::ContactPhone).string().null())
                    .col(
                        ColumnDef::new(Shippers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Shippers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shippers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Shippers {
    Table,
    Id,
    Name,
    ContactEmail,
    ContactPhone,
    CreatedAt,
    UpdatedAt,
}
