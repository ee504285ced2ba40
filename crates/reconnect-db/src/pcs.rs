//! PC repository

use reconnect_core::Id;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PcRow {
    pub pc_id: Id,
    pub pc_name: String,
    pub purchase_year: Option<i64>,
    pub inventory_number: Option<String>,
    pub pc_role: Option<String>,
    pub bench_id: Option<Id>,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PcInput {
    pub pc_name: String,
    pub purchase_year: Option<i64>,
    pub inventory_number: Option<String>,
    pub pc_role: Option<String>,
    pub bench_id: Option<Id>,
    pub active: bool,
}

const COLUMNS: &str =
    "pc_id, pc_name, purchase_year, inventory_number, pc_role, bench_id, active";

pub struct PcRepository {
    db: Database,
}

impl PcRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<PcRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM pcs ORDER BY pc_name"),
                params![],
            )
            .await
    }

    /// PCs attached to a given test bench.
    pub async fn list_for_bench(&self, bench_id: Id) -> AccessResult<Vec<PcRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM pcs WHERE bench_id = ? ORDER BY pc_name"),
                params![bench_id],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<PcRow>> {
        self.db
            .query_one(
                &format!("SELECT {COLUMNS} FROM pcs WHERE pc_id = ?"),
                params![id],
            )
            .await
    }

    pub async fn create(&self, input: PcInput) -> AccessResult<PcRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO pcs \
                 (pc_name, purchase_year, inventory_number, pc_role, bench_id, active) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    input.pc_name,
                    input.purchase_year,
                    input.inventory_number,
                    input.pc_role,
                    input.bench_id,
                    input.active,
                ],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace.
    pub async fn update(&self, id: Id, input: PcInput) -> AccessResult<PcRow> {
        let affected = self
            .db
            .update(
                "UPDATE pcs SET pc_name = ?, purchase_year = ?, inventory_number = ?, \
                 pc_role = ?, bench_id = ?, active = ? WHERE pc_id = ?",
                params![
                    input.pc_name,
                    input.purchase_year,
                    input.inventory_number,
                    input.pc_role,
                    input.bench_id,
                    input.active,
                    id,
                ],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound { entity: "pc", id });
        }
        self.require(id).await
    }

    /// Fails with a foreign-key violation while VMs or assignments still
    /// reference this PC.
    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update("DELETE FROM pcs WHERE pc_id = ?", params![id])
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound { entity: "pc", id });
        }
        Ok(())
    }

    async fn require(&self, id: Id) -> AccessResult<PcRow> {
        self.find_by_id(id)
            .await?
            .ok_or(AccessError::NotFound { entity: "pc", id })
    }
}
