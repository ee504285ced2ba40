//! # reconnect-db
//!
//! Database layer for Chassis ReConnect.
//!
//! The heart of this crate is the relational access layer in [`access`]: a
//! uniform `query` / `query_one` / `insert` / `update` / `transaction`
//! interface over a pooled SQLite connection with a structured error
//! taxonomy. Per-entity repositories (benches, PCs, VMs, licenses, ...) are
//! thin callers of that interface.
//!
//! ## Example
//!
//! ```ignore
//! use reconnect_core::config::DatabaseSettings;
//! use reconnect_db::{Database, ProjectInput, ProjectRepository};
//!
//! let db = Database::connect(&DatabaseSettings::default()).await?;
//! reconnect_db::init_schema(&db).await?;
//!
//! let projects = ProjectRepository::new(db.clone());
//! let project = projects.create(ProjectInput { project_name: "Alpha".into() }).await?;
//! ```

pub mod access;
pub mod pool;
pub mod schema;

pub mod benches;
pub mod groups;
pub mod licenses;
pub mod pcs;
pub mod platforms;
pub mod projects;
pub mod software;
pub mod users;
pub mod vms;
pub mod wetbenches;

// Re-exports
pub use access::{AccessError, AccessResult, ConstraintKind, SqlValue, TxHandle};
pub use pool::Database;
pub use schema::init_schema;

pub use benches::{
    BenchInput, BenchRepository, BenchRow, InstallationInput, InstallationRow, OperationInput,
    OperationRow, TechnologyInput, TechnologyRow,
};
pub use groups::{GroupInput, GroupRepository, GroupRow};
pub use licenses::{LicenseAssignmentRow, LicenseInput, LicenseRepository, LicenseRow};
pub use pcs::{PcInput, PcRepository, PcRow};
pub use platforms::{PlatformInput, PlatformRepository, PlatformRow};
pub use projects::{ProjectInput, ProjectRepository, ProjectRow};
pub use software::{SoftwareAssignmentRow, SoftwareInput, SoftwareRepository, SoftwareRow};
pub use users::{UserInput, UserPermission, UserRepository, UserRow};
pub use vms::{VmInput, VmRepository, VmRow};
pub use wetbenches::{WetbenchInput, WetbenchRepository, WetbenchRow};
