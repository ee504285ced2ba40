//! Access layer contract tests against an in-memory database.

use futures::future::FutureExt;
use reconnect_db::access::{AccessError, ConstraintKind, TxHandle};
use reconnect_db::{init_schema, params, Database};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
struct ProjectProbe {
    project_id: i64,
    project_name: String,
}

async fn test_db() -> Database {
    let db = Database::in_memory().await.expect("in-memory database");
    init_schema(&db).await.expect("schema");
    db
}

async fn project_names(db: &Database) -> Vec<String> {
    let rows: Vec<ProjectProbe> = db
        .query(
            "SELECT project_id, project_name FROM projects ORDER BY project_name",
            params![],
        )
        .await
        .expect("query");
    rows.into_iter().map(|p| p.project_name).collect()
}

#[tokio::test]
async fn query_with_no_rows_returns_empty() {
    let db = test_db().await;

    let rows: Vec<ProjectProbe> = db
        .query(
            "SELECT project_id, project_name FROM projects WHERE project_name = ?",
            params!["missing"],
        )
        .await
        .expect("query must not fail on absence");
    assert!(rows.is_empty());

    let row: Option<ProjectProbe> = db
        .query_one(
            "SELECT project_id, project_name FROM projects WHERE project_name = ?",
            params!["missing"],
        )
        .await
        .expect("query_one must not fail on absence");
    assert!(row.is_none());
}

#[tokio::test]
async fn insert_returns_id_resolvable_by_query_one() {
    let db = test_db().await;

    let id = db
        .insert(
            "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
            params!["Alpha", chrono::Utc::now()],
        )
        .await
        .expect("insert");

    let row: ProjectProbe = db
        .query_one(
            "SELECT project_id, project_name FROM projects WHERE project_id = ?",
            params![id],
        )
        .await
        .expect("query_one")
        .expect("row just inserted must exist");

    assert_eq!(row.project_id, id);
    assert_eq!(row.project_name, "Alpha");
}

#[tokio::test]
async fn insert_without_created_row_is_an_error() {
    let db = test_db().await;

    let err = db
        .insert(
            "UPDATE projects SET project_name = project_name WHERE project_id = ?",
            params![999i64],
        )
        .await
        .expect_err("statement created no row");
    assert!(matches!(err, AccessError::Insert(_)));
}

#[tokio::test]
async fn update_with_non_matching_where_returns_zero() {
    let db = test_db().await;

    let affected = db
        .update(
            "UPDATE projects SET project_name = ? WHERE project_id = ?",
            params!["renamed", 12345i64],
        )
        .await
        .expect("zero affected rows is not an error");
    assert_eq!(affected, 0);

    let affected = db
        .update(
            "DELETE FROM projects WHERE project_name = ?",
            params!["missing"],
        )
        .await
        .expect("zero affected rows is not an error");
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn unique_violation_is_a_constraint_error() {
    let db = test_db().await;

    db.insert(
        "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
        params!["Alpha", chrono::Utc::now()],
    )
    .await
    .expect("first insert");

    let err = db
        .insert(
            "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
            params!["Alpha", chrono::Utc::now()],
        )
        .await
        .expect_err("duplicate name");
    assert!(err.is_constraint(ConstraintKind::Unique), "got {err:?}");
}

#[tokio::test]
async fn fk_protected_delete_is_a_constraint_error() {
    let db = test_db().await;

    let platform_id = db
        .insert(
            "INSERT INTO platforms (platform_name) VALUES (?)",
            params!["Gen5"],
        )
        .await
        .expect("platform");
    let now = chrono::Utc::now();
    db.insert(
        "INSERT INTO test_benches \
         (hil_name, bench_type, system_type, platform_id, active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 1, ?, ?)",
        params!["HIL-01", "fullsize", "BCM", platform_id, now, now],
    )
    .await
    .expect("bench");

    let err = db
        .update(
            "DELETE FROM platforms WHERE platform_id = ?",
            params![platform_id],
        )
        .await
        .expect_err("platform is still referenced");
    assert!(err.is_constraint(ConstraintKind::ForeignKey), "got {err:?}");
}

#[tokio::test]
async fn missing_column_is_a_decode_error() {
    #[derive(Debug, FromRow)]
    #[allow(dead_code)]
    struct WrongShape {
        project_id: i64,
        nonexistent: String,
    }

    let db = test_db().await;
    db.insert(
        "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
        params!["Alpha", chrono::Utc::now()],
    )
    .await
    .expect("insert");

    let err = db
        .query::<WrongShape>("SELECT project_id, project_name FROM projects", params![])
        .await
        .expect_err("row shape mismatch");
    assert!(matches!(err, AccessError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn committed_transaction_is_visible_afterwards() {
    let db = test_db().await;

    db.transaction(|tx: &mut TxHandle| {
        async move {
            tx.insert(
                "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
                params!["Alpha", chrono::Utc::now()],
            )
            .await?;
            tx.insert(
                "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
                params!["Bravo", chrono::Utc::now()],
            )
            .await?;
            Ok(())
        }
        .boxed()
    })
    .await
    .expect("commit");

    assert_eq!(project_names(&db).await, vec!["Alpha", "Bravo"]);
}

#[tokio::test]
async fn failed_transaction_rolls_back_completely() {
    let db = test_db().await;

    for name in ["Alpha", "Bravo"] {
        db.insert(
            "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
            params![name, chrono::Utc::now()],
        )
        .await
        .expect("seed");
    }

    // Delete everything, insert a replacement, then fail before commit.
    let err = db
        .transaction(|tx: &mut TxHandle| {
            async move {
                tx.update("DELETE FROM projects", params![]).await?;
                tx.insert(
                    "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
                    params!["Charlie", chrono::Utc::now()],
                )
                .await?;
                Err::<(), _>(AccessError::Database("forced failure".to_string()))
            }
            .boxed()
        })
        .await
        .expect_err("body error must re-raise");
    assert!(matches!(err, AccessError::Database(_)));

    // Pre-transaction state is intact, nothing from the body is visible.
    assert_eq!(project_names(&db).await, vec!["Alpha", "Bravo"]);
}

#[tokio::test]
async fn constraint_failure_inside_transaction_rolls_back_earlier_statements() {
    let db = test_db().await;

    db.insert(
        "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
        params!["Alpha", chrono::Utc::now()],
    )
    .await
    .expect("seed");

    let err = db
        .transaction(|tx: &mut TxHandle| {
            async move {
                tx.insert(
                    "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
                    params!["Bravo", chrono::Utc::now()],
                )
                .await?;
                // Duplicate of the seeded row.
                tx.insert(
                    "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
                    params!["Alpha", chrono::Utc::now()],
                )
                .await?;
                Ok(())
            }
            .boxed()
        })
        .await
        .expect_err("unique violation must abort the transaction");
    assert!(err.is_constraint(ConstraintKind::Unique), "got {err:?}");

    assert_eq!(project_names(&db).await, vec!["Alpha"]);
}

#[tokio::test]
async fn transaction_returns_body_value() {
    let db = test_db().await;

    let id = db
        .transaction(|tx: &mut TxHandle| {
            async move {
                tx.insert(
                    "INSERT INTO projects (project_name, created_at) VALUES (?, ?)",
                    params!["Alpha", chrono::Utc::now()],
                )
                .await
            }
            .boxed()
        })
        .await
        .expect("commit");

    let row: Option<ProjectProbe> = db
        .query_one(
            "SELECT project_id, project_name FROM projects WHERE project_id = ?",
            params![id],
        )
        .await
        .expect("query_one");
    assert_eq!(row.expect("inserted row").project_name, "Alpha");
}
