//! Software repository
//!
//! Software may be installed on many machines at once, so assignments here
//! accumulate rather than replace. Each assignment still references exactly
//! one of {PC, VM} via [`AssignmentTarget`].

use chrono::{DateTime, Utc};
use reconnect_core::{AssignmentTarget, Id};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SoftwareRow {
    pub software_id: Id,
    pub software_name: String,
    pub vendor: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoftwareInput {
    pub software_name: String,
    pub vendor: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SoftwareAssignmentRow {
    pub assignment_id: Id,
    pub software_id: Id,
    pub pc_id: Option<Id>,
    pub vm_id: Option<Id>,
    pub installed_at: DateTime<Utc>,
}

impl SoftwareAssignmentRow {
    pub fn target(&self) -> Option<AssignmentTarget> {
        AssignmentTarget::from_column_pair(self.pc_id, self.vm_id)
    }
}

const COLUMNS: &str = "software_id, software_name, vendor, version";

pub struct SoftwareRepository {
    db: Database,
}

impl SoftwareRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<SoftwareRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM software ORDER BY software_name, version"),
                params![],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<SoftwareRow>> {
        self.db
            .query_one(
                &format!("SELECT {COLUMNS} FROM software WHERE software_id = ?"),
                params![id],
            )
            .await
    }

    pub async fn create(&self, input: SoftwareInput) -> AccessResult<SoftwareRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO software (software_name, vendor, version) VALUES (?, ?, ?)",
                params![input.software_name, input.vendor, input.version],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace.
    pub async fn update(&self, id: Id, input: SoftwareInput) -> AccessResult<SoftwareRow> {
        let affected = self
            .db
            .update(
                "UPDATE software SET software_name = ?, vendor = ?, version = ? \
                 WHERE software_id = ?",
                params![input.software_name, input.vendor, input.version, id],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "software",
                id,
            });
        }
        self.require(id).await
    }

    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update("DELETE FROM software WHERE software_id = ?", params![id])
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "software",
                id,
            });
        }
        Ok(())
    }

    pub async fn assignments(&self, software_id: Id) -> AccessResult<Vec<SoftwareAssignmentRow>> {
        self.db
            .query(
                "SELECT assignment_id, software_id, pc_id, vm_id, installed_at \
                 FROM software_assignments WHERE software_id = ? ORDER BY assignment_id",
                params![software_id],
            )
            .await
    }

    /// Record an installation on one more machine.
    pub async fn add_assignment(
        &self,
        software_id: Id,
        target: AssignmentTarget,
    ) -> AccessResult<SoftwareAssignmentRow> {
        let (pc_id, vm_id) = target.column_pair();
        let assignment_id = self
            .db
            .insert(
                "INSERT INTO software_assignments (software_id, pc_id, vm_id, installed_at) \
                 VALUES (?, ?, ?, ?)",
                params![software_id, pc_id, vm_id, Utc::now()],
            )
            .await?;

        self.db
            .query_one(
                "SELECT assignment_id, software_id, pc_id, vm_id, installed_at \
                 FROM software_assignments WHERE assignment_id = ?",
                params![assignment_id],
            )
            .await?
            .ok_or(AccessError::NotFound {
                entity: "software assignment",
                id: assignment_id,
            })
    }

    pub async fn remove_assignment(&self, software_id: Id, assignment_id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update(
                "DELETE FROM software_assignments WHERE assignment_id = ? AND software_id = ?",
                params![assignment_id, software_id],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "software assignment",
                id: assignment_id,
            });
        }
        Ok(())
    }

    async fn require(&self, id: Id) -> AccessResult<SoftwareRow> {
        self.find_by_id(id).await?.ok_or(AccessError::NotFound {
            entity: "software",
            id,
        })
    }
}
