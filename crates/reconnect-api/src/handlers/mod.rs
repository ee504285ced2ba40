//! Request handlers, one module per entity.

pub mod benches;
pub mod groups;
pub mod licenses;
pub mod pcs;
pub mod platforms;
pub mod projects;
pub mod software;
pub mod users;
pub mod vms;
pub mod wetbenches;

use reconnect_core::{AssignmentTarget, Id};
use serde::Deserialize;

use crate::error::ApiError;

/// Request body for license/software assignments.
///
/// Exactly one of `pc_id` and `vm_id` must be set; this is validated here,
/// before the repository is called.
#[derive(Debug, Deserialize)]
pub struct AssignmentBody {
    pub pc_id: Option<Id>,
    pub vm_id: Option<Id>,
}

impl AssignmentBody {
    pub fn target(self) -> Result<AssignmentTarget, ApiError> {
        AssignmentTarget::from_column_pair(self.pc_id, self.vm_id).ok_or_else(|| {
            ApiError::bad_request("assignment must reference exactly one of pc_id and vm_id")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_body_rejects_both_and_neither() {
        assert!(AssignmentBody {
            pc_id: Some(1),
            vm_id: Some(2)
        }
        .target()
        .is_err());
        assert!(AssignmentBody {
            pc_id: None,
            vm_id: None
        }
        .target()
        .is_err());
        assert_eq!(
            AssignmentBody {
                pc_id: None,
                vm_id: Some(2)
            }
            .target()
            .unwrap(),
            AssignmentTarget::Vm(2)
        );
    }
}
