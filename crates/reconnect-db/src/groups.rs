//! User group repository
//!
//! Each group carries exactly one permission level, stored as its canonical
//! string and decoded into [`PermissionLevel`] on the way out.

use futures::future::FutureExt;
use reconnect_core::{Id, PermissionLevel};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult, TxHandle};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow)]
struct RawGroupRow {
    group_id: Id,
    group_name: String,
    permission_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRow {
    pub group_id: Id,
    pub group_name: String,
    pub permission_level: PermissionLevel,
}

impl RawGroupRow {
    fn decode(self) -> AccessResult<GroupRow> {
        let permission_level =
            self.permission_level
                .parse()
                .map_err(|_| AccessError::Decode {
                    column: "permission_level".to_string(),
                    message: format!("unknown permission level: {}", self.permission_level),
                })?;
        Ok(GroupRow {
            group_id: self.group_id,
            group_name: self.group_name,
            permission_level,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupInput {
    pub group_name: String,
    pub permission_level: PermissionLevel,
}

pub struct GroupRepository {
    db: Database,
}

impl GroupRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<GroupRow>> {
        let rows: Vec<RawGroupRow> = self
            .db
            .query(
                "SELECT group_id, group_name, permission_level FROM user_groups \
                 ORDER BY group_name",
                params![],
            )
            .await?;
        rows.into_iter().map(RawGroupRow::decode).collect()
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<GroupRow>> {
        let row: Option<RawGroupRow> = self
            .db
            .query_one(
                "SELECT group_id, group_name, permission_level FROM user_groups \
                 WHERE group_id = ?",
                params![id],
            )
            .await?;
        row.map(RawGroupRow::decode).transpose()
    }

    pub async fn create(&self, input: GroupInput) -> AccessResult<GroupRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO user_groups (group_name, permission_level) VALUES (?, ?)",
                params![input.group_name, input.permission_level.as_str()],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace.
    pub async fn update(&self, id: Id, input: GroupInput) -> AccessResult<GroupRow> {
        let affected = self
            .db
            .update(
                "UPDATE user_groups SET group_name = ?, permission_level = ? \
                 WHERE group_id = ?",
                params![input.group_name, input.permission_level.as_str(), id],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound {
                entity: "group",
                id,
            });
        }
        self.require(id).await
    }

    /// Delete a group, detaching its member users first. Both statements
    /// commit or roll back together.
    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        self.db
            .transaction(|tx: &mut TxHandle| {
                async move {
                    tx.update(
                        "UPDATE users SET group_id = NULL WHERE group_id = ?",
                        params![id],
                    )
                    .await?;
                    let affected = tx
                        .update("DELETE FROM user_groups WHERE group_id = ?", params![id])
                        .await?;
                    if affected == 0 {
                        return Err(AccessError::NotFound {
                            entity: "group",
                            id,
                        });
                    }
                    Ok(())
                }
                .boxed()
            })
            .await
    }

    async fn require(&self, id: Id) -> AccessResult<GroupRow> {
        self.find_by_id(id).await?.ok_or(AccessError::NotFound {
            entity: "group",
            id,
        })
    }
}
