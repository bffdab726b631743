//! Task code allocation through the task handlers.

use std::collections::HashSet;
use std::sync::Arc;

use labtrack::audit::adapters::memory::InMemoryAuditLog;
use labtrack::config::TrackerConfig;
use rstest::rstest;

use super::helpers::{App, MemoryApp, SaturatedTasks, YieldingTasks, id_of, signed_in, text_of};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn codes_follow_the_project_prefix_and_survive_deletion() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Beta Program (BP)").await;

    let first = app.create_task(&project_id, "Draft protocol").await;
    let second = app.create_task(&project_id, "Order reagents").await;
    assert_eq!(first.status.code(), 201);
    assert_eq!(text_of(&first, "customId"), "BP-1");
    assert_eq!(text_of(&second, "customId"), "BP-2");

    let deleted = app.task_api.delete(&signed_in(), &id_of(&first)).await;
    assert_eq!(deleted.status.code(), 200);

    let preview = app.task_api.peek_next_code(&project_id).await;
    assert_eq!(text_of(&preview, "customId"), "BP-3");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_the_latest_task_does_not_reissue_its_code() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Lab Management System").await;

    app.create_task(&project_id, "Calibrate pump").await;
    let latest = app.create_task(&project_id, "Label freezer").await;
    assert_eq!(text_of(&latest, "customId"), "LMS-2");
    app.task_api.delete(&signed_in(), &id_of(&latest)).await;

    let replacement = app.create_task(&project_id, "Label freezer again").await;
    assert_eq!(text_of(&replacement, "customId"), "LMS-3");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn codes_are_monotonic_within_a_project() {
    let app = MemoryApp::in_memory();
    let project_id = app.create_project("Data Lake").await;

    let mut previous = 0_u32;
    for title in ["Ingest", "Partition", "Compact", "Archive"] {
        let response = app.create_task(&project_id, title).await;
        let code = text_of(&response, "customId");
        let number: u32 = code
            .strip_prefix("DL-")
            .and_then(|digits| digits.parse().ok())
            .unwrap_or_else(|| panic!("unexpected code {code}"));
        assert!(number > previous, "{code} does not follow {previous}");
        previous = number;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_allocate_independently() {
    let app = MemoryApp::in_memory();
    let lab = app.create_project("Lab Management System").await;
    let beta = app.create_project("Beta Program (BP)").await;

    let lab_task = app.create_task(&lab, "Calibrate pump").await;
    let beta_task = app.create_task(&beta, "Recruit testers").await;

    assert_eq!(text_of(&lab_task, "customId"), "LMS-1");
    assert_eq!(text_of(&beta_task, "customId"), "BP-1");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_receive_distinct_codes() {
    let app = Arc::new(App::with_stores(
        YieldingTasks::default(),
        InMemoryAuditLog::new(),
        &TrackerConfig::default(),
    ));
    let project_id = app.create_project("Beta Program (BP)").await;

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let shared = Arc::clone(&app);
            let project = project_id.clone();
            tokio::spawn(async move {
                shared
                    .create_task(&project, &format!("Parallel task {index}"))
                    .await
            })
        })
        .collect();

    let mut codes = HashSet::new();
    for handle in handles {
        let response = handle.await.expect("create task joins");
        assert_eq!(response.status.code(), 201, "{response:?}");
        codes.insert(text_of(&response, "customId"));
    }

    assert_eq!(codes.len(), 4, "codes were reissued: {codes:?}");
    assert_eq!(app.summaries(&project_id).await.len(), 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exhausted_allocation_is_a_bad_request() {
    let app = App::with_stores(
        SaturatedTasks::default(),
        InMemoryAuditLog::new(),
        &TrackerConfig::default().with_max_attempts(2),
    );
    let project_id = app.create_project("Beta Program (BP)").await;

    let response = app.create_task(&project_id, "Never stored").await;

    assert_eq!(response.status.code(), 400);
    assert!(app.summaries(&project_id).await.is_empty());
}
