//! Wetbench repository

use reconnect_core::Id;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WetbenchRow {
    pub wetbench_id: Id,
    pub wetbench_name: String,
    pub pp_number: Option<String>,
    pub owner: Option<String>,
    pub system_type: Option<String>,
    pub platform_id: Option<Id>,
    pub bench_id: Option<Id>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WetbenchInput {
    pub wetbench_name: String,
    pub pp_number: Option<String>,
    pub owner: Option<String>,
    pub system_type: Option<String>,
    pub platform_id: Option<Id>,
    pub bench_id: Option<Id>,
}

const COLUMNS: &str =
    "wetbench_id, wetbench_name, pp_number, owner, system_type, platform_id, bench_id";

pub struct WetbenchRepository {
    db: Database,
}

impl WetbenchRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<WetbenchRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM wetbenches ORDER BY wetbench_name"),
                params![],
            )
            .await
    }

    /// Wetbenches attached to a given test bench.
    pub async fn list_for_bench(&self, bench_id: Id) -> AccessResult<Vec<WetbenchRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM wetbenches WHERE bench_id = ? ORDER BY wetbench_name"),
                params![bench_id],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<WetbenchRow>> {
        self.db
            .query_one(
                &format!("SELECT {COLUMNS} FROM wetbenches WHERE wetbench_id = ?"),
                params![id],
            )
            .await
    }

    pub async fn create(&self, input: WetbenchInput) -> AccessResult<WetbenchRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO wetbenches \
                 (wetbench_name, pp_number, owner, system_type, platform_id, bench_id) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    input.wetbench_name,
                    input.pp_number,
                    input.owner,
                    input.system_type,
                    input.platform_id,
                    input.bench_id,
                ],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace.
    pub async fn update(&self, id: Id, input: WetbenchInput) -> AccessResult<WetbenchRow> {
        let affected = self
            .db
            .update(
                "UPDATE wetbenches SET wetbench_name = ?, pp_number = ?, owner = ?, \
                 system_type = ?, platform_id = ?, bench_id = ? WHERE wetbench_id = ?",
                params![
                    input.wetbench_name,
                    input.pp_number,
                    input.owner,
                    input.system_type,
                    input.platform_id,
                    input.bench_id,
                    id,
                ],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "wetbench",
                id,
            });
        }
        self.require(id).await
    }

    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update("DELETE FROM wetbenches WHERE wetbench_id = ?", params![id])
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "wetbench",
                id,
            });
        }
        Ok(())
    }

    async fn require(&self, id: Id) -> AccessResult<WetbenchRow> {
        self.find_by_id(id).await?.ok_or(AccessError::NotFound {
            entity: "wetbench",
            id,
        })
    }
}
