//! User repository

use chrono::{DateTime, Utc};
use reconnect_core::{Id, PermissionLevel};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::access::{AccessError, AccessResult};
use crate::params;
use crate::pool::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRow {
    pub user_id: Id,
    pub user_name: String,
    pub email: Option<String>,
    pub group_id: Option<Id>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub user_name: String,
    pub email: Option<String>,
    pub group_id: Option<Id>,
    pub active: bool,
}

/// User joined with their group's permission level, for the route gate.
#[derive(Debug, Clone, FromRow)]
struct RawUserPermission {
    user_id: Id,
    user_name: String,
    active: bool,
    permission_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserPermission {
    pub user_id: Id,
    pub user_name: String,
    pub active: bool,
    pub permission_level: PermissionLevel,
}

const COLUMNS: &str = "user_id, user_name, email, group_id, active, created_at";

pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AccessResult<Vec<UserRow>> {
        self.db
            .query(
                &format!("SELECT {COLUMNS} FROM users ORDER BY user_name"),
                params![],
            )
            .await
    }

    pub async fn find_by_id(&self, id: Id) -> AccessResult<Option<UserRow>> {
        self.db
            .query_one(
                &format!("SELECT {COLUMNS} FROM users WHERE user_id = ?"),
                params![id],
            )
            .await
    }

    pub async fn find_by_name(&self, name: &str) -> AccessResult<Option<UserRow>> {
        self.db
            .query_one(
                &format!("SELECT {COLUMNS} FROM users WHERE user_name = ?"),
                params![name],
            )
            .await
    }

    /// Resolve a user together with their group's permission level.
    ///
    /// Users without a group get the lowest level, `Read`.
    pub async fn find_permission(&self, id: Id) -> AccessResult<Option<UserPermission>> {
        let row: Option<RawUserPermission> = self
            .db
            .query_one(
                "SELECT u.user_id, u.user_name, u.active, g.permission_level \
                 FROM users u LEFT JOIN user_groups g ON g.group_id = u.group_id \
                 WHERE u.user_id = ?",
                params![id],
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let permission_level = match row.permission_level {
            Some(level) => level.parse().map_err(|_| AccessError::Decode {
                column: "permission_level".to_string(),
                message: format!("unknown permission level: {level}"),
            })?,
            None => PermissionLevel::Read,
        };

        Ok(Some(UserPermission {
            user_id: row.user_id,
            user_name: row.user_name,
            active: row.active,
            permission_level,
        }))
    }

    pub async fn create(&self, input: UserInput) -> AccessResult<UserRow> {
        let id = self
            .db
            .insert(
                "INSERT INTO users (user_name, email, group_id, active, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    input.user_name,
                    input.email,
                    input.group_id,
                    input.active,
                    Utc::now(),
                ],
            )
            .await?;
        self.require(id).await
    }

    /// Full-row replace; `created_at` is preserved.
    pub async fn update(&self, id: Id, input: UserInput) -> AccessResult<UserRow> {
        let affected = self
            .db
            .update(
                "UPDATE users SET user_name = ?, email = ?, group_id = ?, active = ? \
                 WHERE user_id = ?",
                params![input.user_name, input.email, input.group_id, input.active, id],
            )
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound { entity: "user", id });
        }
        self.require(id).await
    }

    pub async fn delete(&self, id: Id) -> AccessResult<()> {
        let affected = self
            .db
            .update("DELETE FROM users WHERE user_id = ?", params![id])
            .await?;
        if affected == 0 {
            return Err(AccessError::NotFound { entity: "user", id });
        }
        Ok(())
    }

    async fn require(&self, id: Id) -> AccessResult<UserRow> {
        self.find_by_id(id)
            .await?
            .ok_or(AccessError::NotFound { entity: "user", id })
    }
}
