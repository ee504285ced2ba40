//! Repository behavior tests against an in-memory database.

use reconnect_core::{AssignmentTarget, PermissionLevel};
use reconnect_db::access::{AccessError, ConstraintKind};
use reconnect_db::{
    init_schema, params, BenchInput, BenchRepository, Database, GroupInput, GroupRepository,
    LicenseInput, LicenseRepository, PcInput, PcRepository, ProjectInput, ProjectRepository,
    SoftwareInput, SoftwareRepository, TechnologyInput, UserInput, UserRepository,
};

async fn test_db() -> Database {
    let db = Database::in_memory().await.expect("in-memory database");
    init_schema(&db).await.expect("schema");
    db
}

fn bench_input(name: &str) -> BenchInput {
    BenchInput {
        hil_name: name.to_string(),
        bench_type: "fullsize".to_string(),
        system_type: "BCM".to_string(),
        platform_id: None,
        location: Some("Lab 2".to_string()),
        active: true,
    }
}

fn pc_input(name: &str, bench_id: Option<i64>) -> PcInput {
    PcInput {
        pc_name: name.to_string(),
        purchase_year: Some(2022),
        inventory_number: Some("INV-100".to_string()),
        pc_role: Some("host".to_string()),
        bench_id,
        active: true,
    }
}

#[tokio::test]
async fn project_create_then_lookup() {
    let db = test_db().await;
    let repo = ProjectRepository::new(db);

    let created = repo
        .create(ProjectInput {
            project_name: "Alpha".to_string(),
        })
        .await
        .expect("create");

    let found = repo
        .find_by_id(created.project_id)
        .await
        .expect("find")
        .expect("created project must exist");
    assert_eq!(found.project_name, "Alpha");
}

#[tokio::test]
async fn update_is_a_full_row_replace() {
    let db = test_db().await;
    let repo = PcRepository::new(db);

    let pc = repo.create(pc_input("bench-pc-1", None)).await.expect("create");

    // Replacing with a sparse input clears the optional fields.
    let replaced = repo
        .update(
            pc.pc_id,
            PcInput {
                pc_name: "bench-pc-1".to_string(),
                purchase_year: None,
                inventory_number: None,
                pc_role: None,
                bench_id: None,
                active: false,
            },
        )
        .await
        .expect("update");

    assert_eq!(replaced.purchase_year, None);
    assert_eq!(replaced.inventory_number, None);
    assert_eq!(replaced.pc_role, None);
    assert!(!replaced.active);
}

#[tokio::test]
async fn missing_ids_surface_not_found() {
    let db = test_db().await;
    let repo = ProjectRepository::new(db);

    let err = repo
        .update(
            4242,
            ProjectInput {
                project_name: "Ghost".to_string(),
            },
        )
        .await
        .expect_err("no such project");
    assert!(matches!(err, AccessError::NotFound { .. }));

    let err = repo.delete(4242).await.expect_err("no such project");
    assert!(matches!(err, AccessError::NotFound { .. }));
}

#[tokio::test]
async fn bench_delete_removes_detail_rows() {
    let db = test_db().await;
    let repo = BenchRepository::new(db);

    let bench = repo.create(bench_input("HIL-01")).await.expect("bench");
    repo.set_technology(
        bench.bench_id,
        TechnologyInput {
            fiu_info: Some("FIU rev2".to_string()),
            io_info: None,
            can_interface: Some("CAN FD".to_string()),
            power_interface: None,
        },
    )
    .await
    .expect("technology");

    repo.delete(bench.bench_id).await.expect("delete");

    assert!(repo
        .technology(bench.bench_id)
        .await
        .expect("query")
        .is_none());
    assert!(repo.find_by_id(bench.bench_id).await.expect("query").is_none());
}

#[tokio::test]
async fn bench_delete_with_attached_pc_rolls_back() {
    let db = test_db().await;
    let benches = BenchRepository::new(db.clone());
    let pcs = PcRepository::new(db);

    let bench = benches.create(bench_input("HIL-02")).await.expect("bench");
    benches
        .set_technology(
            bench.bench_id,
            TechnologyInput {
                fiu_info: None,
                io_info: Some("DS2211".to_string()),
                can_interface: None,
                power_interface: None,
            },
        )
        .await
        .expect("technology");
    pcs.create(pc_input("hil02-host", Some(bench.bench_id)))
        .await
        .expect("pc");

    let err = benches
        .delete(bench.bench_id)
        .await
        .expect_err("bench is still referenced by a pc");
    assert!(err.is_constraint(ConstraintKind::ForeignKey), "got {err:?}");

    // The detail-row deletes inside the transaction were rolled back.
    assert!(benches
        .technology(bench.bench_id)
        .await
        .expect("query")
        .is_some());
    assert!(benches
        .find_by_id(bench.bench_id)
        .await
        .expect("query")
        .is_some());
}

#[tokio::test]
async fn set_technology_replaces_existing_row() {
    let db = test_db().await;
    let repo = BenchRepository::new(db.clone());

    let bench = repo.create(bench_input("HIL-03")).await.expect("bench");
    repo.set_technology(
        bench.bench_id,
        TechnologyInput {
            fiu_info: Some("rev1".to_string()),
            io_info: None,
            can_interface: None,
            power_interface: None,
        },
    )
    .await
    .expect("first set");
    repo.set_technology(
        bench.bench_id,
        TechnologyInput {
            fiu_info: Some("rev2".to_string()),
            io_info: None,
            can_interface: None,
            power_interface: None,
        },
    )
    .await
    .expect("second set");

    #[derive(sqlx::FromRow)]
    struct Count {
        n: i64,
    }
    let count: Count = db
        .query_one(
            "SELECT COUNT(*) AS n FROM hil_technology WHERE bench_id = ?",
            params![bench.bench_id],
        )
        .await
        .expect("count")
        .expect("one row");
    assert_eq!(count.n, 1);

    let tech = repo
        .technology(bench.bench_id)
        .await
        .expect("query")
        .expect("row");
    assert_eq!(tech.fiu_info.as_deref(), Some("rev2"));
}

#[tokio::test]
async fn license_assign_replaces_previous_target() {
    let db = test_db().await;
    let pcs = PcRepository::new(db.clone());
    let licenses = LicenseRepository::new(db);

    let pc = pcs.create(pc_input("lic-host", None)).await.expect("pc");
    let license = licenses
        .create(LicenseInput {
            license_name: "CANoe".to_string(),
            vendor: Some("Vector".to_string()),
            license_key: "CANOE-0001".to_string(),
            expiration_date: None,
        })
        .await
        .expect("license");

    let first = licenses
        .assign(license.license_id, AssignmentTarget::Pc(pc.pc_id))
        .await
        .expect("assign to pc");
    assert_eq!(first.target(), Some(AssignmentTarget::Pc(pc.pc_id)));

    // Re-assigning replaces instead of accumulating.
    licenses
        .assign(license.license_id, AssignmentTarget::Pc(pc.pc_id))
        .await
        .expect("re-assign");
    let assignments = licenses
        .assignments(license.license_id)
        .await
        .expect("assignments");
    assert_eq!(assignments.len(), 1);
}

#[tokio::test]
async fn license_assignment_to_missing_machine_is_a_constraint_error() {
    let db = test_db().await;
    let licenses = LicenseRepository::new(db);

    let license = licenses
        .create(LicenseInput {
            license_name: "Matlab".to_string(),
            vendor: None,
            license_key: "ML-0001".to_string(),
            expiration_date: None,
        })
        .await
        .expect("license");

    let err = licenses
        .assign(license.license_id, AssignmentTarget::Pc(9999))
        .await
        .expect_err("no such pc");
    assert!(err.is_constraint(ConstraintKind::ForeignKey), "got {err:?}");
}

#[tokio::test]
async fn software_assignments_accumulate() {
    let db = test_db().await;
    let pcs = PcRepository::new(db.clone());
    let software = SoftwareRepository::new(db);

    let pc_a = pcs.create(pc_input("sw-host-a", None)).await.expect("pc");
    let pc_b = pcs.create(pc_input("sw-host-b", None)).await.expect("pc");
    let entry = software
        .create(SoftwareInput {
            software_name: "ControlDesk".to_string(),
            vendor: Some("dSPACE".to_string()),
            version: "7.5".to_string(),
        })
        .await
        .expect("software");

    software
        .add_assignment(entry.software_id, AssignmentTarget::Pc(pc_a.pc_id))
        .await
        .expect("first install");
    software
        .add_assignment(entry.software_id, AssignmentTarget::Pc(pc_b.pc_id))
        .await
        .expect("second install");

    let assignments = software
        .assignments(entry.software_id)
        .await
        .expect("assignments");
    assert_eq!(assignments.len(), 2);
}

#[tokio::test]
async fn group_delete_detaches_members() {
    let db = test_db().await;
    let groups = GroupRepository::new(db.clone());
    let users = UserRepository::new(db);

    let group = groups
        .create(GroupInput {
            group_name: "editors".to_string(),
            permission_level: PermissionLevel::Edit,
        })
        .await
        .expect("group");
    let user = users
        .create(UserInput {
            user_name: "jdoe".to_string(),
            email: Some("jdoe@example.com".to_string()),
            group_id: Some(group.group_id),
            active: true,
        })
        .await
        .expect("user");

    groups.delete(group.group_id).await.expect("delete group");

    let detached = users
        .find_by_id(user.user_id)
        .await
        .expect("find")
        .expect("user still exists");
    assert_eq!(detached.group_id, None);
}

#[tokio::test]
async fn permission_resolution_defaults_to_read() {
    let db = test_db().await;
    let groups = GroupRepository::new(db.clone());
    let users = UserRepository::new(db);

    let admins = groups
        .create(GroupInput {
            group_name: "admins".to_string(),
            permission_level: PermissionLevel::Admin,
        })
        .await
        .expect("group");

    let admin = users
        .create(UserInput {
            user_name: "root".to_string(),
            email: None,
            group_id: Some(admins.group_id),
            active: true,
        })
        .await
        .expect("admin user");
    let loner = users
        .create(UserInput {
            user_name: "guest".to_string(),
            email: None,
            group_id: None,
            active: true,
        })
        .await
        .expect("groupless user");

    let admin_perm = users
        .find_permission(admin.user_id)
        .await
        .expect("query")
        .expect("exists");
    assert_eq!(admin_perm.permission_level, PermissionLevel::Admin);

    let loner_perm = users
        .find_permission(loner.user_id)
        .await
        .expect("query")
        .expect("exists");
    assert_eq!(loner_perm.permission_level, PermissionLevel::Read);

    assert!(users
        .find_permission(9999)
        .await
        .expect("query")
        .is_none());
}
