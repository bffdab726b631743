//! Audit trail written by the task, project and feed handlers.

use labtrack::api::RequestContext;
use labtrack::audit::{
    adapters::memory::InMemoryAuditLog,
    domain::{ActivityType, AuditEventDraft, AuditSubject, EntityKind, EntityRef},
};
use labtrack::config::TrackerConfig;
use labtrack::task::adapters::memory::InMemoryTaskRepository;
use rstest::rstest;
use serde_json::{Value, json};

use super::helpers::{App, MemoryApp, UnavailableAuditLog, id_of, signed_in, text_of};

fn descriptions(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.get("description")
                        .or_else(|| item.pointer("/details/description"))
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_task_mutation_reaches_both_logs() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let task_id = id_of(&app.create_task(&project_id, "Calibrate pump").await);

    app.task_api
        .update(&signed_in(), &task_id, &json!({ "status": "done" }))
        .await;
    app.task_api.delete(&signed_in(), &task_id).await;

    let tags: Vec<ActivityType> = app
        .feed()
        .await
        .into_iter()
        .map(|event| event.activity_type)
        .collect();
    assert_eq!(
        tags,
        vec![
            ActivityType::TaskDeleted,
            ActivityType::TaskUpdated,
            ActivityType::TaskCreated,
            ActivityType::ProjectCreated,
        ]
    );

    let task_log = app
        .audit_api
        .entity_activity("task", &task_id)
        .await;
    assert_eq!(
        descriptions(&task_log.body),
        vec![
            r#"Ada deleted task "Calibrate pump""#.to_owned(),
            r#"Ada changed the status of "Calibrate pump" from todo to done"#.to_owned(),
            r#"Ada created task "Calibrate pump" (LMS-1)"#.to_owned(),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_activity_endpoint_lists_entries_newest_first() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let task_id = id_of(&app.create_task(&project_id, "Calibrate pump").await);
    app.task_api
        .update(&signed_in(), &task_id, &json!({ "priority": "high" }))
        .await;

    let response = app.task_api.activity(&task_id).await;

    assert_eq!(response.status.code(), 200);
    let actions: Vec<&str> = response
        .body
        .as_array()
        .expect("entries array")
        .iter()
        .filter_map(|entry| entry.get("action").and_then(Value::as_str))
        .collect();
    assert_eq!(actions, vec!["task_updated", "task_created"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_updates_record_the_changed_fields() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;

    let response = app
        .project_api
        .update(
            &signed_in(),
            &project_id,
            &json!({ "name": "Lab Management System", "description": "Core facility" }),
        )
        .await;
    assert_eq!(response.status.code(), 200);

    let log = app.project_api.activity(&project_id).await;
    let latest = log
        .body
        .as_array()
        .and_then(|entries| entries.first())
        .expect("project has activity");
    assert_eq!(latest.get("action"), Some(&json!("project_updated")));
    let changes = latest
        .pointer("/details/changes")
        .and_then(Value::as_array)
        .expect("changes recorded");
    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes.first().and_then(|change| change.get("field")),
        Some(&json!("description"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unchanged_project_update_is_not_audited() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;

    app.project_api
        .update(
            &signed_in(),
            &project_id,
            &json!({ "name": "Lab Management System" }),
        )
        .await;

    assert_eq!(app.feed().await.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_project_mutations_use_the_configured_identity() {
    let app = MemoryApp::in_memory();

    app.project_api
        .create(&RequestContext::anonymous(), &json!({ "name": "Kiosk Project" }))
        .await;

    let events = app.feed().await;
    let event = events.first().expect("project creation audited");
    assert_eq!(event.user.id, "anonymous");
    assert_eq!(event.description, r#"Anonymous created project "Kiosk Project""#);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_task_mutations_are_not_audited() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;

    let response = app
        .task_api
        .create(
            &RequestContext::anonymous(),
            &json!({ "title": "Walk-in task", "projectId": project_id }),
        )
        .await;

    assert_eq!(response.status.code(), 201);
    assert_eq!(app.feed().await.len(), 1);
}

#[rstest]
#[case(json!({ "limit": 2 }), 2)]
#[case(json!({ "skip": 3 }), 1)]
#[case(json!({ "type": "task_created" }), 2)]
#[case(json!({ "type": "project_created", "limit": 10 }), 1)]
#[case(Value::Null, 4)]
#[tokio::test(flavor = "multi_thread")]
async fn feed_honours_paging_and_filters(#[case] params: Value, #[case] expected: usize) {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let task_id = id_of(&app.create_task(&project_id, "Calibrate pump").await);
    app.create_task(&project_id, "Label freezer").await;
    app.task_api
        .update(&signed_in(), &task_id, &json!({ "progress": 40 }))
        .await;

    let response = app.audit_api.feed(&params).await;

    assert_eq!(response.status.code(), 200);
    assert_eq!(response.body.as_array().map(Vec::len), Some(expected));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn feed_filters_by_entity() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let task_id = id_of(&app.create_task(&project_id, "Calibrate pump").await);
    app.create_task(&project_id, "Label freezer").await;

    let response = app
        .audit_api
        .feed(&json!({ "entityKind": "task", "entityId": task_id }))
        .await;

    assert_eq!(
        descriptions(&response.body),
        vec![r#"Ada created task "Calibrate pump" (LMS-1)"#.to_owned()]
    );
}

#[rstest]
#[case(json!({ "type": "task_exploded" }))]
#[case(json!({ "entityKind": "task" }))]
#[case(json!({ "limit": "ten" }))]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_feed_parameters_are_rejected(#[case] params: Value) {
    let app = MemoryApp::in_memory();

    let response = app.audit_api.feed(&params).await;

    assert_eq!(response.status.code(), 400);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn direct_audit_covers_records_outside_the_task_store() {
    let app = MemoryApp::in_memory();
    let subject = AuditSubject::new(
        EntityRef::new(EntityKind::Training, "tr-9"),
        "Biosafety level 2",
    );

    let recorded = app
        .audit_api
        .record_direct(
            &signed_in(),
            &json!({}),
            AuditEventDraft::new(ActivityType::TrainingCompleted, subject),
        )
        .await;

    assert!(recorded.is_some());
    let log = app.audit_api.entity_activity("training", "tr-9").await;
    assert_eq!(
        descriptions(&log.body),
        vec![r#"Ada completed training "Biosafety level 2""#.to_owned()]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn audit_outage_does_not_change_the_response() {
    let app = App::with_stores(
        InMemoryTaskRepository::new(),
        UnavailableAuditLog,
        &TrackerConfig::default(),
    );
    let project_id = app.create_project("Lab Management System").await;

    let response = app.create_task(&project_id, "Calibrate pump").await;

    assert_eq!(response.status.code(), 201);
    assert_eq!(text_of(&response, "customId"), "LMS-1");
    assert_eq!(app.summaries(&project_id).await.len(), 1);
    let task_log = app.task_api.activity(&id_of(&response)).await;
    assert_eq!(task_log.body, json!([]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_audit_records_nothing() {
    let app = App::with_stores(
        InMemoryTaskRepository::new(),
        InMemoryAuditLog::new(),
        &TrackerConfig::without_audit(),
    );
    let project_id = app.create_project("Lab Management System").await;
    app.create_task(&project_id, "Calibrate pump").await;

    let response = app.audit_api.feed(&Value::Null).await;

    assert_eq!(response.body, json!([]));
}
