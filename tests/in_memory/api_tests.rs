//! Response statuses produced by the handlers.

use labtrack::api::{ApiResponse, RequestContext};
use labtrack::audit::services::TaskOperation;
use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::{MemoryApp, id_of, signed_in, text_of};

fn unknown_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[rstest]
#[case(json!({ "title": "   " }))]
#[case(json!({ "projectId": "not-a-uuid", "title": "Calibrate pump" }))]
#[case(json!({ "title": "Calibrate pump", "progress": 140 }))]
#[case(json!({ "title": "Calibrate pump", "status": "sleeping" }))]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_task_bodies_are_bad_requests(#[case] body: Value) {
    let app = MemoryApp::in_memory();

    let response = app.task_api.create(&signed_in(), &body).await;

    assert_eq!(response.status.code(), 400, "{response:?}");
    assert!(response.body.get("error").is_some());
    assert!(app.feed().await.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_in_an_unknown_project_is_not_found() {
    let app = MemoryApp::in_memory();

    let response = app.create_task(&unknown_id(), "Calibrate pump").await;

    assert_eq!(response.status.code(), 404);
}

#[rstest]
#[case("not-a-uuid", 400)]
#[case("", 400)]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_path_ids_are_bad_requests(#[case] id: &str, #[case] expected: u16) {
    let app = MemoryApp::in_memory();

    assert_eq!(app.task_api.get(id).await.status.code(), expected);
    assert_eq!(
        app.task_api
            .update(&signed_in(), id, &json!({ "status": "done" }))
            .await
            .status
            .code(),
        expected
    );
    assert_eq!(app.task_api.delete(&signed_in(), id).await.status.code(), expected);
    assert_eq!(app.project_api.get(id).await.status.code(), expected);
    assert_eq!(app.task_api.peek_next_code(id).await.status.code(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_records_are_not_found() {
    let app = MemoryApp::in_memory();
    let id = unknown_id();

    assert_eq!(app.task_api.get(&id).await.status.code(), 404);
    assert_eq!(app.task_api.activity(&id).await.status.code(), 404);
    assert_eq!(
        app.task_api
            .update(&signed_in(), &id, &json!({ "status": "done" }))
            .await
            .status
            .code(),
        404
    );
    assert_eq!(app.task_api.delete(&signed_in(), &id).await.status.code(), 404);
    assert_eq!(app.project_api.get(&id).await.status.code(), 404);
    assert_eq!(app.project_api.activity(&id).await.status.code(), 404);
    assert_eq!(
        app.project_api
            .delete(&signed_in(), &id, &Value::Null)
            .await
            .status
            .code(),
        404
    );
    assert_eq!(app.task_api.peek_next_code(&id).await.status.code(), 404);
    assert!(app.feed().await.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_round_trip_through_the_handlers() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let created = app
        .task_api
        .create(
            &signed_in(),
            &json!({
                "title": "Calibrate pump",
                "projectId": project_id,
                "priority": "high",
                "dueDate": "2026-11-02",
            }),
        )
        .await;
    let task_id = id_of(&created);

    let fetched = app.task_api.get(&task_id).await;
    assert_eq!(fetched.status.code(), 200);
    assert_eq!(text_of(&fetched, "customId"), "LMS-1");
    assert_eq!(text_of(&fetched, "priority"), "high");
    assert_eq!(text_of(&fetched, "dueDate"), "2026-11-02");

    let updated = app
        .task_api
        .update(&signed_in(), &task_id, &json!({ "assignee": null, "progress": 60 }))
        .await;
    assert_eq!(updated.status.code(), 200);
    assert_eq!(updated.body.get("progress"), Some(&json!(60)));

    let removed = app.task_api.delete(&signed_in(), &task_id).await;
    assert_eq!(removed.status.code(), 200);
    assert_eq!(text_of(&removed, "title"), "Calibrate pump");
    assert_eq!(app.task_api.get(&task_id).await.status.code(), 404);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_round_trip_through_the_handlers() {
    let app = MemoryApp::in_memory();
    let created = app
        .project_api
        .create(
            &signed_in(),
            &json!({ "name": "Beta Program (BP)", "description": "Second cohort" }),
        )
        .await;
    assert_eq!(created.status.code(), 201);
    let project_id = id_of(&created);

    let blank = app
        .project_api
        .update(&signed_in(), &project_id, &json!({ "name": " " }))
        .await;
    assert_eq!(blank.status.code(), 400);

    let removed = app
        .project_api
        .delete(&signed_in(), &project_id, &Value::Null)
        .await;
    assert_eq!(removed.status.code(), 200);
    assert_eq!(text_of(&removed, "description"), "Second cohort");
    assert_eq!(app.project_api.get(&project_id).await.status.code(), 404);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sub_resource_handlers_are_audited_through_the_task_interceptor() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let task_id = id_of(&app.create_task(&project_id, "Calibrate pump").await);
    let operation = TaskOperation::AddComment(task_id.parse().expect("valid task id"));

    let response = app
        .task_api
        .intercept(
            &signed_in(),
            &operation,
            &json!({ "text": "Seal looks worn" }),
            || async { ApiResponse::created(&json!({ "id": "c-1" })) },
        )
        .await;

    assert_eq!(response.status.code(), 201);
    let latest = app.feed().await;
    assert_eq!(
        latest.first().map(|event| event.description.as_str()),
        Some(r#"Ada commented on "Calibrate pump""#)
    );

    let anonymous = app
        .task_api
        .intercept(
            &RequestContext::anonymous(),
            &operation,
            &json!({ "text": "Drive-by" }),
            || async { ApiResponse::created(&json!({ "id": "c-2" })) },
        )
        .await;
    assert_eq!(anonymous.status.code(), 201);
    assert_eq!(app.feed().await.len(), latest.len());
}
