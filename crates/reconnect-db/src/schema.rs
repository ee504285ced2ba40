//! Schema bootstrap
//!
//! Creates the fixed relational schema on startup. Every statement is
//! `CREATE TABLE IF NOT EXISTS`, so initialization is idempotent and safe to
//! run on an existing database file.

use crate::access::AccessResult;
use crate::pool::Database;

/// Create all tables if they do not exist yet.
pub async fn init_schema(db: &Database) -> AccessResult<()> {
    for ddl in TABLES {
        db.update(ddl, crate::params![]).await?;
    }
    tracing::debug!(tables = TABLES.len(), "schema initialized");
    Ok(())
}

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS platforms (
        platform_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        platform_name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS test_benches (
        bench_id    INTEGER PRIMARY KEY AUTOINCREMENT,
        hil_name    TEXT NOT NULL UNIQUE,
        bench_type  TEXT NOT NULL,
        system_type TEXT NOT NULL,
        platform_id INTEGER REFERENCES platforms(platform_id),
        location    TEXT,
        active      INTEGER NOT NULL DEFAULT 1,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hil_technology (
        technology_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        bench_id        INTEGER NOT NULL UNIQUE REFERENCES test_benches(bench_id),
        fiu_info        TEXT,
        io_info         TEXT,
        can_interface   TEXT,
        power_interface TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hil_operation (
        operation_id     INTEGER PRIMARY KEY AUTOINCREMENT,
        bench_id         INTEGER NOT NULL UNIQUE REFERENCES test_benches(bench_id),
        possible_tests   TEXT,
        vehicle_datasets TEXT,
        scenarios        TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hardware_installations (
        installation_id INTEGER PRIMARY KEY AUTOINCREMENT,
        bench_id        INTEGER NOT NULL UNIQUE REFERENCES test_benches(bench_id),
        ecu_info        TEXT,
        sensors         TEXT,
        actuators       TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS wetbenches (
        wetbench_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        wetbench_name TEXT NOT NULL UNIQUE,
        pp_number     TEXT,
        owner         TEXT,
        system_type   TEXT,
        platform_id   INTEGER REFERENCES platforms(platform_id),
        bench_id      INTEGER REFERENCES test_benches(bench_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pcs (
        pc_id            INTEGER PRIMARY KEY AUTOINCREMENT,
        pc_name          TEXT NOT NULL UNIQUE,
        purchase_year    INTEGER,
        inventory_number TEXT,
        pc_role          TEXT,
        bench_id         INTEGER REFERENCES test_benches(bench_id),
        active           INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vms (
        vm_id      INTEGER PRIMARY KEY AUTOINCREMENT,
        vm_name    TEXT NOT NULL UNIQUE,
        host_pc_id INTEGER REFERENCES pcs(pc_id),
        purpose    TEXT,
        status     TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        project_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        project_name TEXT NOT NULL UNIQUE,
        created_at   TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS software (
        software_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        software_name TEXT NOT NULL,
        vendor        TEXT,
        version       TEXT NOT NULL,
        UNIQUE (software_name, version)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS software_assignments (
        assignment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        software_id   INTEGER NOT NULL REFERENCES software(software_id),
        pc_id         INTEGER REFERENCES pcs(pc_id),
        vm_id         INTEGER REFERENCES vms(vm_id),
        installed_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS licenses (
        license_id      INTEGER PRIMARY KEY AUTOINCREMENT,
        license_name    TEXT NOT NULL,
        vendor          TEXT,
        license_key     TEXT NOT NULL UNIQUE,
        expiration_date TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS license_assignments (
        assignment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        license_id    INTEGER NOT NULL REFERENCES licenses(license_id),
        pc_id         INTEGER REFERENCES pcs(pc_id),
        vm_id         INTEGER REFERENCES vms(vm_id),
        assigned_at   TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_groups (
        group_id         INTEGER PRIMARY KEY AUTOINCREMENT,
        group_name       TEXT NOT NULL UNIQUE,
        permission_level TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id    INTEGER PRIMARY KEY AUTOINCREMENT,
        user_name  TEXT NOT NULL UNIQUE,
        email      TEXT,
        group_id   INTEGER REFERENCES user_groups(group_id),
        active     INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    )
    "#,
];
