//! End-to-end handler tests: routing, permission gate, and status mapping.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use reconnect_core::PermissionLevel;
use reconnect_db::{
    init_schema, Database, GroupInput, GroupRepository, UserInput, UserRepository,
};
use tower::util::ServiceExt;

use reconnect_api::{api_router, AppState};

struct TestApp {
    router: Router,
    admin_id: i64,
    editor_id: i64,
    reader_id: i64,
}

async fn test_app() -> TestApp {
    let db = Database::in_memory().await.expect("in-memory database");
    init_schema(&db).await.expect("schema");

    let groups = GroupRepository::new(db.clone());
    let users = UserRepository::new(db.clone());

    let mut ids = Vec::new();
    for (group_name, level, user_name) in [
        ("admins", PermissionLevel::Admin, "admin"),
        ("editors", PermissionLevel::Edit, "editor"),
        ("readers", PermissionLevel::Read, "reader"),
    ] {
        let group = groups
            .create(GroupInput {
                group_name: group_name.to_string(),
                permission_level: level,
            })
            .await
            .expect("group");
        let user = users
            .create(UserInput {
                user_name: user_name.to_string(),
                email: None,
                group_id: Some(group.group_id),
                active: true,
            })
            .await
            .expect("user");
        ids.push(user.user_id);
    }

    TestApp {
        router: api_router(AppState::new(db)),
        admin_id: ids[0],
        editor_id: ids[1],
        reader_id: ids[2],
    }
}

fn request(method: Method, uri: &str, user_id: Option<i64>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(request(Method::GET, "/pcs", None, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_identity_is_unauthorized() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(request(Method::GET, "/pcs", Some(9999), None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reader_can_list_but_not_mutate() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(request(Method::GET, "/pcs", Some(app.reader_id), None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(request(
            Method::POST,
            "/pcs",
            Some(app.reader_id),
            Some(r#"{"pc_name":"host-1","purchase_year":null,"inventory_number":null,"pc_role":null,"bench_id":null,"active":true}"#),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn editor_can_create_inventory_but_not_users() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            "/projects",
            Some(app.editor_id),
            Some(r#"{"project_name":"Alpha"}"#),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .oneshot(request(
            Method::POST,
            "/users",
            Some(app.editor_id),
            Some(r#"{"user_name":"intruder","email":null,"group_id":null,"active":true}"#),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_manage_users() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::POST,
            "/users",
            Some(app.admin_id),
            Some(r#"{"user_name":"newcomer","email":"n@example.com","group_id":null,"active":true}"#),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn missing_entity_maps_to_404() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(request(Method::GET, "/benches/777", Some(app.reader_id), None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fk_protected_delete_maps_to_409() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            "/benches",
            Some(app.editor_id),
            Some(r#"{"hil_name":"HIL-01","bench_type":"fullsize","system_type":"BCM","platform_id":null,"location":null,"active":true}"#),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            "/pcs",
            Some(app.editor_id),
            Some(r#"{"pc_name":"hil01-host","purchase_year":null,"inventory_number":null,"pc_role":null,"bench_id":1,"active":true}"#),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .oneshot(request(
            Method::DELETE,
            "/benches/1",
            Some(app.editor_id),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_assignment_maps_to_400() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            "/licenses",
            Some(app.editor_id),
            Some(r#"{"license_name":"CANoe","vendor":"Vector","license_key":"C-1","expiration_date":null}"#),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Both pc_id and vm_id set.
    let response = app
        .router
        .oneshot(request(
            Method::PUT,
            "/licenses/1/assignments",
            Some(app.editor_id),
            Some(r#"{"pc_id":1,"vm_id":1}"#),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
