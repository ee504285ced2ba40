//! Platform repository

use reconnect_core::Id;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformRow {
    pub platform_id: Id,
    pub platform_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformInput {
    pub platform_name: String,
}

pub struct PlatformRepository {
    db: Database,
}

impl PlatformRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<PlatformRow>> {
        self.db
            .query(
                "SELECT platform_id, platform_name FROM platforms ORDER BY platform_name",
                params![],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<PlatformRow>> {
        self.db
            .query_one(
                "SELECT platform_id, platform_name FROM platforms WHERE platform_id = ?",
                params![id],
            )
            .await
    }

    pub async fn create(&self, input: PlatformInput) -> AccessResult<PlatformRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO platforms (platform_name) VALUES (?)",
                params![input.platform_name],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace.
    pub async fn update(&self, id: Id, input: PlatformInput) -> AccessResult<PlatformRow> {
        let affected = self
            .db
            .update(
                "UPDATE platforms SET platform_name = ? WHERE platform_id = ?",
                params![input.platform_name, id],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "platform",
                id,
            });
        }
        self.require(id).await
    }

    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update(
                "DELETE FROM platforms WHERE platform_id = ?",
                params![id],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "platform",
                id,
            });
        }
        Ok(())
    }

    async fn require(&self, id: Id) -> AccessResult<PlatformRow> {
        self.find_by_id(id).await?.ok_or(AccessError::NotFound {
            entity: "platform",
            id,
        })
    }
}
