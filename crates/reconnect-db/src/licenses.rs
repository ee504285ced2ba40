//! License repository
//!
//! A license assignment references exactly one of {PC, VM}. The choice is
//! carried as an [`AssignmentTarget`], so an ill-formed pc/vm pair cannot
//! reach the access layer from here.

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::FutureExt;
use reconnect_core::{AssignmentTarget, Id};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult, TxHandle};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LicenseRow {
    pub license_id: Id,
    pub license_name: String,
    pub vendor: Option<String>,
    pub license_key: String,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseInput {
    pub license_name: String,
    pub vendor: Option<String>,
    pub license_key: String,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LicenseAssignmentRow {
    pub assignment_id: Id,
    pub license_id: Id,
    pub pc_id: Option<Id>,
    pub vm_id: Option<Id>,
    pub assigned_at: DateTime<Utc>,
}

impl LicenseAssignmentRow {
    pub fn target(&self) -> Option<AssignmentTarget> {
        AssignmentTarget::from_column_pair(self.pc_id, self.vm_id)
    }
}

const COLUMNS: &str = "license_id, license_name, vendor, license_key, expiration_date";

pub struct LicenseRepository {
    db: Database,
}

impl LicenseRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<LicenseRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM licenses ORDER BY license_name"),
                params![],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<LicenseRow>> {
        self.db
            .query_one(
                &format!("SELECT {COLUMNS} FROM licenses WHERE license_id = ?"),
                params![id],
            )
            .await
    }

    pub async fn create(&self, input: LicenseInput) -> AccessResult<LicenseRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO licenses (license_name, vendor, license_key, expiration_date) \
                 VALUES (?, ?, ?, ?)",
                params![
                    input.license_name,
                    input.vendor,
                    input.license_key,
                    input.expiration_date,
                ],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace.
    pub async fn update(&self, id: Id, input: LicenseInput) -> AccessResult<LicenseRow> {
        let affected = self
            .db
            .update(
                "UPDATE licenses SET license_name = ?, vendor = ?, license_key = ?, \
                 expiration_date = ? WHERE license_id = ?",
                params![
                    input.license_name,
                    input.vendor,
                    input.license_key,
                    input.expiration_date,
                    id,
                ],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "license",
                id,
            });
        }
        self.require(id).await
    }

    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update("DELETE FROM licenses WHERE license_id = ?", params![id])
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "license",
                id,
            });
        }
        Ok(())
    }

    pub async fn assignments(&self, license_id: Id) -> AccessResult<Vec<LicenseAssignmentRow>> {
        self.db
            .query(
                "SELECT assignment_id, license_id, pc_id, vm_id, assigned_at \
                 FROM license_assignments WHERE license_id = ? ORDER BY assignment_id",
                params![license_id],
            )
            .await
    }

    /// Move the license to a new target: any existing assignment rows are
    /// removed and the new one inserted atomically.
    pub async fn assign(
        &self,
        license_id: Id,
        target: AssignmentTarget,
    ) -> AccessResult<LicenseAssignmentRow> {
        let (pc_id, vm_id) = target.column_pair();
        let assignment_id = self
            .db
            .transaction(|tx: &mut TxHandle| {
                async move {
                    tx.update(
                        "DELETE FROM license_assignments WHERE license_id = ?",
                        params![license_id],
                    )
                    .await?;
                    tx.insert(
                        "INSERT INTO license_assignments (license_id, pc_id, vm_id, assigned_at) \
                         VALUES (?, ?, ?, ?)",
                        params![license_id, pc_id, vm_id, Utc::now()],
                    )
                    .await
                }
                .boxed()
            })
            .await?;

        self.db
            .query_one(
                "SELECT assignment_id, license_id, pc_id, vm_id, assigned_at \
                 FROM license_assignments WHERE assignment_id = ?",
                params![assignment_id],
            )
            .await?
            .ok_or(AccessError::NotFound {
                entity: "license assignment",
                id: assignment_id,
            })
    }

    pub async fn unassign(&self, license_id: Id, assignment_id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update(
                "DELETE FROM license_assignments WHERE assignment_id = ? AND license_id = ?",
                params![assignment_id, license_id],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "license assignment",
                id: assignment_id,
            });
        }
        Ok(())
    }

    async fn require(&self, id: Id) -> AccessResult<LicenseRow> {
        self.find_by_id(id).await?.ok_or(AccessError::NotFound {
            entity: "license",
            id,
        })
    }
}
