//! VM repository

use reconnect_core::Id;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VmRow {
    pub vm_id: Id,
    pub vm_name: String,
    pub host_pc_id: Option<Id>,
    pub purpose: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VmInput {
    pub vm_name: String,
    pub host_pc_id: Option<Id>,
    pub purpose: Option<String>,
    pub status: Option<String>,
}

const COLUMNS: &str = "vm_id, vm_name, host_pc_id, purpose, status";

pub struct VmRepository {
    db: Database,
}

impl VmRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<VmRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM vms ORDER BY vm_name"),
                params![],
            )
            .await
    }

    /// VMs hosted on a given PC.
    pub async fn list_for_pc(&self, pc_id: Id) -> AccessResult<Vec<VmRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM vms WHERE host_pc_id = ? ORDER BY vm_name"),
                params![pc_id],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<VmRow>> {
        self.db
            .query_one(
                &format!("SELECT {COLUMNS} FROM vms WHERE vm_id = ?"),
                params![id],
            )
            .await
    }

    pub async fn create(&self, input: VmInput) -> AccessResult<VmRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO vms (vm_name, host_pc_id, purpose, status) VALUES (?, ?, ?, ?)",
                params![input.vm_name, input.host_pc_id, input.purpose, input.status],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace.
    pub async fn update(&self, id: Id, input: VmInput) -> AccessResult<VmRow> {
        let affected = self
            .db
            .update(
                "UPDATE vms SET vm_name = ?, host_pc_id = ?, purpose = ?, status = ? \
                 WHERE vm_id = ?",
                params![
                    input.vm_name,
                    input.host_pc_id,
                    input.purpose,
                    input.status,
                    id,
                ],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound { entity: "vm", id });
        }
        self.require(id).await
    }

    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update("DELETE FROM vms WHERE vm_id = ?", params![id])
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound { entity: "vm", id });
        }
        Ok(())
    }

    async fn require(&self, id: Id) -> AccessResult<VmRow> {
        self.find_by_id(id)
            .await?
            .ok_or(AccessError::NotFound { entity: "vm", id })
    }
}
