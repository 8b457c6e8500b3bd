pub use sea_orm_migration::prelude::*;

pub mod m20240301_000001_create_shippers_table;
pub mod m20240301_000002_create_loads_table;
pub mod m20240301_000003_create_smart_hubs_table;

mod ddl;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_shippers_table::Migration),
            Box::new(m20240301_000002_create_loads_table::Migration),
            Box::new(m20240301_000003_create_smart_hubs_table::Migration),
        ]
    }
}
