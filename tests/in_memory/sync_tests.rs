//! Project task summary cache kept in step with task writes.

use labtrack::api::ResponseStatus;
use labtrack::audit::adapters::memory::InMemoryAuditLog;
use labtrack::config::TrackerConfig;
use labtrack::project::domain::TaskSummary;
use labtrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskId, TaskPatch, TaskStatus},
    ports::TaskRepository,
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

use super::helpers::{App, BrokenSummaryCache, MemoryApp, id_of, signed_in, text_of};

fn summary_named<'a>(summaries: &'a [TaskSummary], name: &str) -> Option<&'a TaskSummary> {
    summaries.iter().find(|summary| summary.name == name)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_tasks_appear_in_the_project_summary_list() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;

    let created = app.create_task(&project_id, "Calibrate pump").await;

    let summaries = app.summaries(&project_id).await;
    assert_eq!(summaries.len(), 1);
    let summary = summary_named(&summaries, "Calibrate pump").expect("summary cached");
    assert_eq!(summary.id.to_string(), id_of(&created));
    assert_eq!(summary.status, TaskStatus::Todo);

    let task_id: TaskId = id_of(&created).parse().expect("valid task id");
    let project = app.project(&project_id).await;
    assert_eq!(project.task_summary(task_id), Some(summary));
    assert!(project.task_summary(TaskId::new()).is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_updates_leave_one_summary_per_task() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let task_id = id_of(&app.create_task(&project_id, "Calibrate pump").await);
    let patch = json!({ "status": "in-progress", "assignee": "Grace" });

    for _ in 0..2 {
        let response = app.task_api.update(&signed_in(), &task_id, &patch).await;
        assert_eq!(response.status.code(), 200, "{response:?}");
    }

    let summaries = app.summaries(&project_id).await;
    assert_eq!(summaries.len(), 1);
    let summary = summaries.first().expect("one summary");
    assert_eq!(summary.status, TaskStatus::InProgress);
    assert_eq!(summary.assignee.as_deref(), Some("Grace"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_tasks_leave_the_summary_list() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let kept = app.create_task(&project_id, "Calibrate pump").await;
    let removed = app.create_task(&project_id, "Label freezer").await;

    app.task_api.delete(&signed_in(), &id_of(&removed)).await;

    let summaries = app.summaries(&project_id).await;
    assert_eq!(summaries.len(), 1);
    assert_eq!(
        summaries.first().map(|summary| summary.id.to_string()),
        Some(id_of(&kept))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unscoped_tasks_touch_no_project() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;

    let response = app
        .task_api
        .create(&signed_in(), &json!({ "title": "Order coffee" }))
        .await;

    assert_eq!(response.status.code(), 201);
    assert!(response.body.get("customId").is_none());
    assert!(app.summaries(&project_id).await.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconcile_restores_a_summary_written_behind_the_cache() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;
    let task_id = id_of(&app.create_task(&project_id, "Calibrate pump").await);

    let mut stale = app
        .tasks
        .find_by_id(task_id.parse().expect("valid task id"))
        .await
        .expect("task lookup succeeds")
        .expect("task exists");
    let patch: TaskPatch =
        serde_json::from_value(json!({ "status": "done" })).expect("valid patch");
    stale.apply(&patch, &DefaultClock).expect("patch applies");
    app.tasks.update(&stale).await.expect("direct write succeeds");

    let report = app.project_api.reconcile(&project_id).await;
    assert_eq!(report.status.code(), 200);
    assert_eq!(
        report.body,
        json!({ "added": 0, "refreshed": 1, "dropped": 0, "unchanged": 0 })
    );

    let summaries = app.summaries(&project_id).await;
    assert_eq!(
        summaries.first().map(|summary| summary.status),
        Some(TaskStatus::Done)
    );

    let again = app.project_api.reconcile(&project_id).await;
    assert_eq!(
        again.body,
        json!({ "added": 0, "refreshed": 0, "dropped": 0, "unchanged": 1 })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconcile_of_an_unknown_project_is_not_found() {
    let app = MemoryApp::in_memory();
    let unknown = uuid::Uuid::new_v4().to_string();

    let response = app.project_api.reconcile(&unknown).await;

    assert_eq!(response.status.code(), 404);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_cache_outage_does_not_fail_task_writes() {
    let app = App::with_project_store(
        InMemoryTaskRepository::new(),
        InMemoryAuditLog::new(),
        BrokenSummaryCache::default(),
        &TrackerConfig::default(),
    );
    let project_id = app.create_project("Beta Program (BP)").await;

    let created = app.create_task(&project_id, "Draft protocol").await;
    assert_eq!(created.status, ResponseStatus::from_code(201));
    assert_eq!(text_of(&created, "customId"), "BP-1");
    let task_id = id_of(&created);

    let updated = app
        .task_api
        .update(&signed_in(), &task_id, &json!({ "status": "done" }))
        .await;
    assert_eq!(updated.status, ResponseStatus::from_code(200));
    assert_eq!(text_of(&updated, "status"), "done");

    let removed = app.task_api.delete(&signed_in(), &task_id).await;
    assert_eq!(removed.status, ResponseStatus::from_code(200));
    assert_eq!(app.task_api.get(&task_id).await.status.code(), 404);
    assert!(app.summaries(&project_id).await.is_empty());
}
