use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use sea_orm_migration::{MigrationTrait, MigratorTrait, SchemaManager};
use uuid::Uuid;

use carrier_portal_migrations::{
    m20240301_000001_create_shippers_table, m20240301_000002_create_loads_table,
    m20240301_000003_create_smart_hubs_table, Migrator,
};

async fn connect() -> DatabaseConnection {
    Database::connect("sqlite::memory:")
        .await
        .expect("in-memory database")
}

async fn exec(db: &DatabaseConnection, sql: impl Into<String>) -> Result<(), sea_orm::DbErr> {
    db.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.into()))
        .await
        .map(|_| ())
}

async fn insert_shipper(db: &DatabaseConnection, id: Uuid) -> Result<(), sea_orm::DbErr> {
    exec(
        db,
        format!("INSERT INTO shippers (id, name, created_at, updated_at) VALUES ('{id}', 'Acme Shipping', '2024-03-01 00:00:00', '2024-03-01 00:00:00')"),
    )
    .await
}

async fn insert_load(
    db: &DatabaseConnection,
    id: Uuid,
    shipper_id: Uuid,
    reference: &str,
) -> Result<(), sea_orm::DbErr> {
    exec(
        db,
        format!(
            "INSERT INTO loads (id, shipper_id, reference_number, equipment_type, weight, dimensions, \
             pickup_earliest, pickup_latest, delivery_earliest, delivery_latest, created_at, updated_at) \
             VALUES ('{id}', '{shipper_id}', '{reference}', 'DRY_VAN', 4500.0, \
             '{{\"length\":48.0,\"width\":8.5,\"height\":9.0}}', \
             '2024-03-01 08:00:00', '2024-03-01 12:00:00', '2024-03-02 08:00:00', '2024-03-02 17:00:00', \
             '2024-03-01 00:00:00', '2024-03-01 00:00:00')"
        ),
    )
    .await
}

#[tokio::test]
async fn up_steps_can_be_re_run_without_error() {
    let db = connect().await;
    let manager = SchemaManager::new(&db);

    let shippers = m20240301_000001_create_shippers_table::Migration;
    let loads = m20240301_000002_create_loads_table::Migration;
    let hubs = m20240301_000003_create_smart_hubs_table::Migration;

    shippers.up(&manager).await.expect("first shippers up");
    loads.up(&manager).await.expect("first loads up");
    hubs.up(&manager).await.expect("first hubs up");

    // Re-running each step (as a racing second deploy process would) is a
    // no-op, not an error.
    shippers.up(&manager).await.expect("second shippers up");
    loads.up(&manager).await.expect("second loads up");
    hubs.up(&manager).await.expect("second hubs up");
}

#[tokio::test]
async fn the_status_column_defaults_to_created_at_the_schema_level() {
    let db = connect().await;
    Migrator::up(&db, None).await.expect("migrate up");

    let shipper_id = Uuid::new_v4();
    let load_id = Uuid::new_v4();
    insert_shipper(&db, shipper_id).await.expect("insert shipper");
    insert_load(&db, load_id, shipper_id, "RAW-1")
        .await
        .expect("insert load without status");

    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT status FROM loads WHERE id = '{load_id}'"),
        ))
        .await
        .expect("query status")
        .expect("row present");
    let status: String = row.try_get("", "status").expect("status column");
    assert_eq!(status, "CREATED");
}

#[tokio::test]
async fn schema_rejects_duplicate_references_and_orphan_loads() {
    let db = connect().await;
    Migrator::up(&db, None).await.expect("migrate up");

    let shipper_id = Uuid::new_v4();
    insert_shipper(&db, shipper_id).await.expect("insert shipper");

    insert_load(&db, Uuid::new_v4(), shipper_id, "RAW-1")
        .await
        .expect("first load");
    insert_load(&db, Uuid::new_v4(), shipper_id, "RAW-1")
        .await
        .expect_err("duplicate reference_number must be rejected");

    insert_load(&db, Uuid::new_v4(), Uuid::new_v4(), "RAW-2")
        .await
        .expect_err("load referencing an unknown shipper must be rejected");
}

#[tokio::test]
async fn deleting_a_shipper_cascades_at_the_schema_level() {
    let db = connect().await;
    Migrator::up(&db, None).await.expect("migrate up");

    let keep = Uuid::new_v4();
    let gone = Uuid::new_v4();
    insert_shipper(&db, keep).await.unwrap();
    insert_shipper(&db, gone).await.unwrap();
    insert_load(&db, Uuid::new_v4(), keep, "KEEP-1").await.unwrap();
    insert_load(&db, Uuid::new_v4(), gone, "GONE-1").await.unwrap();

    exec(&db, format!("DELETE FROM shippers WHERE id = '{gone}'"))
        .await
        .expect("delete shipper");

    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS n FROM loads".to_string(),
        ))
        .await
        .expect("count loads")
        .expect("row present");
    let remaining: i64 = row.try_get("", "n").expect("count column");
    assert_eq!(remaining, 1, "only the deleted shipper's loads cascade");
}

#[tokio::test]
async fn capacity_is_constrained_non_negative() {
    let db = connect().await;
    Migrator::up(&db, None).await.expect("migrate up");

    let ok = exec(
        &db,
        format!(
            "INSERT INTO smart_hubs (id, name, hub_type, latitude, longitude, address, city, state, zip, capacity) \
             VALUES ('{}', 'Relay', 'TRUCK_STOP', 32.7, -96.8, '100 Relay Rd', 'Dallas', 'TX', '75201', 40)",
            Uuid::new_v4()
        ),
    )
    .await;
    assert!(ok.is_ok());

    let bad = exec(
        &db,
        format!(
            "INSERT INTO smart_hubs (id, name, hub_type, latitude, longitude, address, city, state, zip, capacity) \
             VALUES ('{}', 'Relay', 'TRUCK_STOP', 32.7, -96.8, '100 Relay Rd', 'Dallas', 'TX', '75201', -5)",
            Uuid::new_v4()
        ),
    )
    .await;
    assert!(bad.is_err(), "negative capacity must be rejected");
}

#[tokio::test]
async fn down_then_up_restores_a_usable_schema() {
    let db = connect().await;
    Migrator::up(&db, None).await.expect("migrate up");

    let shipper_id = Uuid::new_v4();
    insert_shipper(&db, shipper_id).await.unwrap();
    insert_load(&db, Uuid::new_v4(), shipper_id, "CYCLE-1")
        .await
        .unwrap();

    Migrator::down(&db, None).await.expect("migrate down");

    // The tables are gone after down.
    exec(&db, "SELECT COUNT(*) FROM loads")
        .await
        .expect_err("loads table should be dropped");
    exec(&db, "SELECT COUNT(*) FROM smart_hubs")
        .await
        .expect_err("smart_hubs table should be dropped");

    // Up from a rolled-back state rebuilds an equivalent, usable schema.
    Migrator::up(&db, None).await.expect("migrate up again");

    let shipper_id = Uuid::new_v4();
    insert_shipper(&db, shipper_id).await.expect("insert after cycle");
    insert_load(&db, Uuid::new_v4(), shipper_id, "CYCLE-2")
        .await
        .expect("insert load after cycle");
}
