//! Test bench repository
//!
//! Covers the bench record itself plus its three one-to-one detail tables
//! (HIL technology, HIL operation, hardware installation). Detail rows are
//! replaced whole and removed together with the bench inside a transaction.

use chrono::{DateTime, Utc};
use futures::future::FutureExt;
use reconnect_core::Id;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult, TxHandle};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BenchRow {
    pub bench_id: Id,
    pub hil_name: String,
    pub bench_type: String,
    pub system_type: String,
    pub platform_id: Option<Id>,
    pub location: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenchInput {
    pub hil_name: String,
    pub bench_type: String,
    pub system_type: String,
    pub platform_id: Option<Id>,
    pub location: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TechnologyRow {
    pub technology_id: Id,
    pub bench_id: Id,
    pub fiu_info: Option<String>,
    pub io_info: Option<String>,
    pub can_interface: Option<String>,
    pub power_interface: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TechnologyInput {
    pub fiu_info: Option<String>,
    pub io_info: Option<String>,
    pub can_interface: Option<String>,
    pub power_interface: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OperationRow {
    pub operation_id: Id,
    pub bench_id: Id,
    pub possible_tests: Option<String>,
    pub vehicle_datasets: Option<String>,
    pub scenarios: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationInput {
    pub possible_tests: Option<String>,
    pub vehicle_datasets: Option<String>,
    pub scenarios: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstallationRow {
    pub installation_id: Id,
    pub bench_id: Id,
    pub ecu_info: Option<String>,
    pub sensors: Option<String>,
    pub actuators: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationInput {
    pub ecu_info: Option<String>,
    pub sensors: Option<String>,
    pub actuators: Option<String>,
}

const BENCH_COLUMNS: &str = "bench_id, hil_name, bench_type, system_type, platform_id, \
                             location, active, created_at, updated_at";

pub struct BenchRepository {
    db: Database,
}

impl BenchRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<BenchRow>> {
        self.db
            .query(
                &format!("SELECT {BENCH_COLUMNS} FROM test_benches ORDER BY hil_name"),
                params![],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<BenchRow>> {
        self.db
            .query_one(
                &format!("SELECT {BENCH_COLUMNS} FROM test_benches WHERE bench_id = ?"),
                params![id],
            )
            .await
    }

    pub async fn create(&self, input: BenchInput) -> AccessResult<BenchRow> {
        let now = Utc::now();
        let id = self
            .db
            .insert(
                "INSERT INTO test_benches \
                 (hil_name, bench_type, system_type, platform_id, location, active, \
                  created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    input.hil_name,
                    input.bench_type,
                    input.system_type,
                    input.platform_id,
                    input.location,
                    input.active,
                    now,
                    now,
                ],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace; `created_at` is preserved, `updated_at` is bumped.
    pub async fn update(&self, id: Id, input: BenchInput) -> AccessResult<BenchRow> {
        let affected = self
            .db
            .update(
                "UPDATE test_benches SET hil_name = ?, bench_type = ?, system_type = ?, \
                 platform_id = ?, location = ?, active = ?, updated_at = ? \
                 WHERE bench_id = ?",
                params![
                    input.hil_name,
                    input.bench_type,
                    input.system_type,
                    input.platform_id,
                    input.location,
                    input.active,
                    Utc::now(),
                    id,
                ],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "bench",
                id,
            });
        }
        self.require(id).await
    }

    /// Delete a bench and its detail rows atomically.
    ///
    /// Fails with a foreign-key constraint violation while PCs or wetbenches
    /// still reference the bench.
    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        self.db
            .transaction(|tx: &mut TxHandle| {
                async move {
                    tx.update(
                        "DELETE FROM hil_technology WHERE bench_id = ?",
                        params![id],
                    )
                    .await?;
                    tx.update(
                        "DELETE FROM hil_operation WHERE bench_id = ?",
                        params![id],
                    )
                    .await?;
                    tx.update(
                        "DELETE FROM hardware_installations WHERE bench_id = ?",
                        params![id],
                    )
                    .await?;
                    let affected = tx
                        .update("DELETE FROM test_benches WHERE bench_id = ?", params![id])
                        .await?;
                    if affected == 0 {
                        return Err(AccessError::NotFound {
                            entity: "bench",
                            id,
                        });
                    }
                    Ok(())
                }
                .boxed()
            })
            .await
    }

    pub async fn technology(&self, bench_id: Id) -> AccessResult<Option<TechnologyRow>> {
        self.db
            .query_one(
                "SELECT technology_id, bench_id, fiu_info, io_info, can_interface, \
                 power_interface FROM hil_technology WHERE bench_id = ?",
                params![bench_id],
            )
            .await
    }

    /// Replace the technology detail row for a bench.
    pub async fn set_technology(
        &self,
        bench_id: Id,
        input: TechnologyInput,
    ) -> AccessResult<TechnologyRow> {
        self.db
            .transaction(|tx: &mut TxHandle| {
                async move {
                    tx.update(
                        "DELETE FROM hil_technology WHERE bench_id = ?",
                        params![bench_id],
                    )
                    .await?;
                    tx.insert(
                        "INSERT INTO hil_technology \
                         (bench_id, fiu_info, io_info, can_interface, power_interface) \
                         VALUES (?, ?, ?, ?, ?)",
                        params![
                            bench_id,
                            input.fiu_info,
                            input.io_info,
                            input.can_interface,
                            input.power_interface,
                        ],
                    )
                    .await?;
                    Ok(())
                }
                .boxed()
            })
            .await?;

        self.technology(bench_id)
            .await?
            .ok_or(AccessError::NotFound {
                entity: "hil technology",
                id: bench_id,
            })
    }

    pub async fn operation(&self, bench_id: Id) -> AccessResult<Option<OperationRow>> {
        self.db
            .query_one(
                "SELECT operation_id, bench_id, possible_tests, vehicle_datasets, scenarios \
                 FROM hil_operation WHERE bench_id = ?",
                params![bench_id],
            )
            .await
    }

    /// Replace the operation detail row for a bench.
    pub async fn set_operation(
        &self,
        bench_id: Id,
        input: OperationInput,
    ) -> AccessResult<OperationRow> {
        self.db
            .transaction(|tx: &mut TxHandle| {
                async move {
                    tx.update(
                        "DELETE FROM hil_operation WHERE bench_id = ?",
                        params![bench_id],
                    )
                    .await?;
                    tx.insert(
                        "INSERT INTO hil_operation \
                         (bench_id, possible_tests, vehicle_datasets, scenarios) \
                         VALUES (?, ?, ?, ?)",
                        params![
                            bench_id,
                            input.possible_tests,
                            input.vehicle_datasets,
                            input.scenarios,
                        ],
                    )
                    .await?;
                    Ok(())
                }
                .boxed()
            })
            .await?;

        self.operation(bench_id)
            .await?
            .ok_or(AccessError::NotFound {
                entity: "hil operation",
                id: bench_id,
            })
    }

    pub async fn installation(&self, bench_id: Id) -> AccessResult<Option<InstallationRow>> {
        self.db
            .query_one(
                "SELECT installation_id, bench_id, ecu_info, sensors, actuators \
                 FROM hardware_installations WHERE bench_id = ?",
                params![bench_id],
            )
            .await
    }

    /// Replace the hardware installation detail row for a bench.
    pub async fn set_installation(
        &self,
        bench_id: Id,
        input: InstallationInput,
    ) -> AccessResult<InstallationRow> {
        self.db
            .transaction(|tx: &mut TxHandle| {
                async move {
                    tx.update(
                        "DELETE FROM hardware_installations WHERE bench_id = ?",
                        params![bench_id],
                    )
                    .await?;
                    tx.insert(
                        "INSERT INTO hardware_installations \
                         (bench_id, ecu_info, sensors, actuators) \
                         VALUES (?, ?, ?, ?)",
                        params![bench_id, input.ecu_info, input.sensors, input.actuators],
                    )
                    .await?;
                    Ok(())
                }
                .boxed()
            })
            .await?;

        self.installation(bench_id)
            .await?
            .ok_or(AccessError::NotFound {
                entity: "hardware installation",
                id: bench_id,
            })
    }

    async fn require(&self, id: Id) -> AccessResult<BenchRow> {
        self.find_by_id(id).await?.ok_or(AccessError::NotFound {
            entity: "bench",
            id,
        })
    }
}
