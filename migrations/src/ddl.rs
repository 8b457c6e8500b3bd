//! Raw-SQL fragments shared by the Postgres branches of the migrations.
//!
//! sea-query has no builder for `CREATE TYPE` guards or row triggers, so
//! these are emitted as single statements. Each statement is idempotent:
//! re-running an up step (or two deploy processes racing on it) is a no-op.

/// `CREATE TYPE ... AS ENUM` wrapped so an already-existing type is ignored.
pub(crate) fn create_enum_type(name: &str, values: &[&str]) -> String {
    let list = values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "DO $$ BEGIN\n    CREATE TYPE {name} AS ENUM ({list});\nEXCEPTION\n    WHEN duplicate_object THEN NULL;\nEND $$;"
    )
}

/// Per-table trigger function that overwrites `updated_at` on every UPDATE,
/// regardless of which columns changed or what value the caller supplied.
pub(crate) fn create_touch_function(table: &str) -> String {
    format!(
        "CREATE OR REPLACE FUNCTION {table}_touch_updated_at() RETURNS trigger AS $$\n\
         BEGIN\n    NEW.updated_at = now();\n    RETURN NEW;\nEND;\n\
         $$ LANGUAGE plpgsql;"
    )
}

/// Installs the BEFORE UPDATE trigger; an already-installed trigger is ignored.
pub(crate) fn create_touch_trigger(table: &str) -> String {
    format!(
        "DO $$ BEGIN\n    CREATE TRIGGER {table}_touch_updated_at\n        \
         BEFORE UPDATE ON {table}\n        FOR EACH ROW\n        \
         EXECUTE FUNCTION {table}_touch_updated_at();\nEXCEPTION\n    \
         WHEN duplicate_object THEN NULL;\nEND $$;"
    )
}

pub(crate) fn drop_touch_trigger(table: &str) -> String {
    format!("DROP TRIGGER IF EXISTS {table}_touch_updated_at ON {table};")
}

pub(crate) fn drop_touch_function(table: &str) -> String {
    format!("DROP FUNCTION IF EXISTS {table}_touch_updated_at();")
}
