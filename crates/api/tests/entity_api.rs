//! HTTP-level integration tests for the site, machine, operation-log, and
//! maintenance-task endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, bootstrap_admin, bootstrap_engineer, create_machine, create_site, delete, get,
    post_json, put_json,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Sites
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_site_crud_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;

    let site_id = create_site(&app, &token, "North Plant").await;

    // Listing includes the machine count.
    let sites = body_json(get(&app, "/api/v1/sites", Some(&token)).await).await;
    let site = sites
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"].as_i64() == Some(site_id))
        .expect("created site should be listed");
    assert_eq!(site["name"], "North Plant");
    assert_eq!(site["machineCount"], 0);

    // Update.
    let response = put_json(
        &app,
        &format!("/api/v1/sites/{site_id}"),
        Some(&token),
        serde_json::json!({ "name": "North Plant II", "location": "Further North" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "North Plant II");

    // Delete.
    let response = delete(&app, &format!("/api/v1/sites/{site_id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_site_create_requires_admin(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin_token = bootstrap_admin(&app).await;
    let engineer_token = bootstrap_engineer(&app, &admin_token).await;

    let response = post_json(
        &app,
        "/api/v1/sites",
        Some(&engineer_token),
        serde_json::json!({ "name": "Rogue Site", "location": "Nowhere" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_site_with_machines_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;

    let site_id = create_site(&app, &token, "Occupied Site").await;
    create_machine(&app, &token, site_id, "Press 1", "Press").await;

    let response = delete(&app, &format!("/api/v1/sites/{site_id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_site_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;

    let response = put_json(
        &app,
        "/api/v1/sites/999999",
        Some(&token),
        serde_json::json!({ "name": "Ghost", "location": "Nowhere" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Machines
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_machine_create_applies_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;
    let site_id = create_site(&app, &token, "Default Site").await;

    let response = post_json(
        &app,
        "/api/v1/machines",
        Some(&token),
        serde_json::json!({ "name": "Bare Machine", "siteId": site_id, "desiredDailyHours": 6 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["machineType"], "general");
    assert_eq!(json["status"], "operational");
    assert_eq!(json["totalHoursRun"], 0);
    assert!(json["nextMaintenanceDate"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_machine_create_with_bad_site_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;

    let response = post_json(
        &app,
        "/api/v1/machines",
        Some(&token),
        serde_json::json!({ "name": "Orphan", "siteId": 999999, "desiredDailyHours": 6 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_machine_listing_includes_site_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;
    let site_id = create_site(&app, &token, "Listing Site").await;
    create_machine(&app, &token, site_id, "Lister", "Lathe").await;

    let machines = body_json(get(&app, "/api/v1/machines", Some(&token)).await).await;
    let machine = machines
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["name"] == "Lister")
        .expect("machine should be listed");
    assert_eq!(machine["siteName"], "Listing Site");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_machine_types_are_distinct_and_sorted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;
    let site_id = create_site(&app, &token, "Type Site").await;

    create_machine(&app, &token, site_id, "P1", "Pump").await;
    create_machine(&app, &token, site_id, "P2", "Pump").await;
    create_machine(&app, &token, site_id, "C1", "Compressor").await;

    let types = body_json(get(&app, "/api/v1/machine-types", Some(&token)).await).await;
    assert_eq!(
        types,
        serde_json::json!(["Compressor", "Pump"]),
        "types should be deduplicated and sorted"
    );
}

// ---------------------------------------------------------------------------
// Operation logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_operation_log_increments_machine_hours(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin_token = bootstrap_admin(&app).await;
    let engineer_token = bootstrap_engineer(&app, &admin_token).await;
    let site_id = create_site(&app, &admin_token, "Hours Site").await;
    let machine_id = create_machine(&app, &admin_token, site_id, "Clocked", "Pump").await;

    let response = post_json(
        &app,
        "/api/v1/operation-logs",
        Some(&engineer_token),
        serde_json::json!({
            "machineId": machine_id,
            "date": "2026-03-02T00:00:00Z",
            "startTime": "08:00",
            "endTime": "16:00",
            "totalHours": 8,
            "engineer": "Engineer User",
            "operator": "Op One",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let machines = body_json(get(&app, "/api/v1/machines", Some(&admin_token)).await).await;
    let machine = machines
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"].as_i64() == Some(machine_id))
        .unwrap();
    assert_eq!(machine["totalHoursRun"], 8);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_operation_log_listing_filters_by_machine(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;
    let site_id = create_site(&app, &token, "Filter Site").await;
    let machine_a = create_machine(&app, &token, site_id, "A", "Pump").await;
    let machine_b = create_machine(&app, &token, site_id, "B", "Pump").await;

    for (machine_id, hours) in [(machine_a, 4), (machine_b, 6)] {
        let response = post_json(
            &app,
            "/api/v1/operation-logs",
            Some(&token),
            serde_json::json!({
                "machineId": machine_id,
                "date": "2026-03-02T00:00:00Z",
                "startTime": "08:00",
                "endTime": "16:00",
                "totalHours": hours,
                "engineer": "E",
                "operator": "O",
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let logs = body_json(
        get(
            &app,
            &format!("/api/v1/operation-logs?machineId={machine_a}"),
            Some(&token),
        )
        .await,
    )
    .await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["totalHours"], 4);
    assert_eq!(logs[0]["siteName"], "Filter Site");
}

// ---------------------------------------------------------------------------
// Maintenance tasks (manual CRUD; reconciliation lives in template_sync_api)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_manual_task_create_and_complete(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin_token = bootstrap_admin(&app).await;
    let engineer_token = bootstrap_engineer(&app, &admin_token).await;
    let site_id = create_site(&app, &admin_token, "Task Site").await;
    let machine_id = create_machine(&app, &admin_token, site_id, "Tasked", "Pump").await;

    let response = post_json(
        &app,
        "/api/v1/maintenance-tasks",
        Some(&admin_token),
        serde_json::json!({
            "machineId": machine_id,
            "task": "Grease bearings",
            "priority": "medium",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await;
    assert_eq!(task["frequency"], "daily", "frequency defaults to daily");
    assert_eq!(task["taskTemplateId"], serde_json::Value::Null);
    let task_id = task["id"].as_i64().unwrap();

    // Engineer completes it; completedBy defaults to the caller's name.
    let response = put_json(
        &app,
        &format!("/api/v1/maintenance-tasks/{task_id}"),
        Some(&engineer_token),
        serde_json::json!({ "completed": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let task = body_json(response).await;
    assert_eq!(task["completed"], true);
    assert_eq!(task["completedBy"], "Engineer User");
    assert!(task["completedDate"].is_string());

    // Un-completing clears the stamps.
    let response = put_json(
        &app,
        &format!("/api/v1/maintenance-tasks/{task_id}"),
        Some(&engineer_token),
        serde_json::json!({ "completed": false }),
    )
    .await;
    let task = body_json(response).await;
    assert_eq!(task["completed"], false);
    assert_eq!(task["completedBy"], serde_json::Value::Null);
    assert_eq!(task["completedDate"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_create_rejects_bad_priority(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = bootstrap_admin(&app).await;
    let site_id = create_site(&app, &token, "Prio Site").await;
    let machine_id = create_machine(&app, &token, site_id, "Picky", "Pump").await;

    let response = post_json(
        &app,
        "/api/v1/maintenance-tasks",
        Some(&token),
        serde_json::json!({
            "machineId": machine_id,
            "task": "Do something",
            "priority": "urgent",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_delete_requires_admin(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin_token = bootstrap_admin(&app).await;
    let engineer_token = bootstrap_engineer(&app, &admin_token).await;
    let site_id = create_site(&app, &admin_token, "Del Site").await;
    let machine_id = create_machine(&app, &admin_token, site_id, "Deletee", "Pump").await;

    let response = post_json(
        &app,
        "/api/v1/maintenance-tasks",
        Some(&admin_token),
        serde_json::json!({ "machineId": machine_id, "task": "Ephemeral", "priority": "low" }),
    )
    .await;
    let task_id = body_json(response).await["id"].as_i64().unwrap();

    let response = delete(
        &app,
        &format!("/api/v1/maintenance-tasks/{task_id}"),
        Some(&engineer_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete(
        &app,
        &format!("/api/v1/maintenance-tasks/{task_id}"),
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
