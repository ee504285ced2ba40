//! Project repository

use chrono::{DateTime, Utc};
use reconnect_core::Id;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRow {
    pub project_id: Id,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub project_name: String,
}

pub struct ProjectRepository {
    db: Database,
}

impl ProjectRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<ProjectRow>> {
        self.db
            .query(
                "SELECT project_id, project_name, created_at FROM projects ORDER BY project_name",
                params![],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<ProjectRow>> {
        self.db
            .query_one(
                "SELECT project_id, project_name, created_at FROM projects WHERE project_id = ?",
                params![id],
            )
            .await
    }

    pub async fn find_by_name(&self, name: &str) -> AccessResult<Option<ProjectRow>> {
        self.db
            .query_one(
                "SELECT project_id, project_name, created_at FROM projects WHERE project_name = ?",
                params![name],
            )
            .await
    }

    pub async fn create(&self, input: ProjectInput) -> AccessResult<ProjectRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
                params![input.project_name, Utc::now()],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace; `created_at` is preserved.
    pub async fn update(&self, id: Id, input: ProjectInput) -> AccessResult<ProjectRow> {
        let affected = self
            .db
            .update(
                "UPDATE projects SET project_name = ? WHERE project_id = ?",
                params![input.project_name, id],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "project",
                id,
            });
        }
        self.require(id).await
    }

    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update("DELETE FROM projects WHERE project_id = ?", params![id])
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }

    async fn require(&self, id: Id) -> AccessResult<ProjectRow> {
        self.find_by_id(id).await?.ok_or(AccessError::NotFound {
            entity: "project",
            id,
        })
    }
}
