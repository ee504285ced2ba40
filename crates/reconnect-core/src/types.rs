//! Shared identifier and permission types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary key type for all entities (SQLite rowid).
pub type Id = i64;

/// Permission level attached to a user group.
///
/// Levels are strictly ordered: `Admin` may do everything `Edit` may,
/// `Edit` everything `Read` may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Read,
    Edit,
    Admin,
}

impl PermissionLevel {
    /// Whether this level satisfies `required`.
    pub fn allows(self, required: PermissionLevel) -> bool {
        self >= required
    }

    /// Canonical name as stored in the `user_groups.permission_level` column.
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Edit => "edit",
            PermissionLevel::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored permission string is not a known level.
#[derive(Debug, thiserror::Error)]
#[error("unknown permission level: {0}")]
pub struct UnknownPermissionLevel(pub String);

impl FromStr for PermissionLevel {
    type Err = UnknownPermissionLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(PermissionLevel::Read),
            "edit" => Ok(PermissionLevel::Edit),
            "admin" => Ok(PermissionLevel::Admin),
            other => Err(UnknownPermissionLevel(other.to_string())),
        }
    }
}

/// Target of a license or software assignment.
///
/// An assignment row must reference exactly one of {PC, VM}; this type makes
/// the choice explicit before any SQL is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentTarget {
    Pc(Id),
    Vm(Id),
}

impl AssignmentTarget {
    /// Split into the `(pc_id, vm_id)` column pair.
    pub fn column_pair(self) -> (Option<Id>, Option<Id>) {
        match self {
            AssignmentTarget::Pc(id) => (Some(id), None),
            AssignmentTarget::Vm(id) => (None, Some(id)),
        }
    }

    /// Build from a nullable column pair, rejecting both-set and neither-set.
    pub fn from_column_pair(pc_id: Option<Id>, vm_id: Option<Id>) -> Option<Self> {
        match (pc_id, vm_id) {
            (Some(pc), None) => Some(AssignmentTarget::Pc(pc)),
            (None, Some(vm)) => Some(AssignmentTarget::Vm(vm)),
            _ => None,
        }
    }
}
