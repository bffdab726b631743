//! Then steps for task code allocation BDD scenarios.

use super::world::{AllocationWorld, run_async};
use eyre::WrapErr;
use labtrack::task::services::TaskLifecycleError;
use rstest_bdd_macros::then;

#[then(r#"the task titled "{title}" has code "{code}""#)]
fn task_has_code(world: &AllocationWorld, title: String, code: String) -> Result<(), eyre::Report> {
    let task = world.task(&title)?;
    let actual = task
        .custom_id()
        .map(ToString::to_string)
        .ok_or_else(|| eyre::eyre!("task {title:?} has no code"))?;
    eyre::ensure!(actual == code, "expected code {code}, found {actual}");
    Ok(())
}

#[then(r#"the task titled "{title}" has no code"#)]
fn task_has_no_code(world: &AllocationWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task(&title)?;
    eyre::ensure!(
        task.custom_id().is_none(),
        "expected no code, found {:?}",
        task.custom_id()
    );
    Ok(())
}

#[then(r#"the next task code is "{code}""#)]
fn next_code_is(world: &AllocationWorld, code: String) -> Result<(), eyre::Report> {
    let project_id = world.project_id()?;
    let next = run_async(world.tasks.peek_next_code(project_id)).wrap_err("peek next code")?;
    eyre::ensure!(
        next.to_string() == code,
        "expected next code {code}, found {next}"
    );
    Ok(())
}

#[then("the project lists {count:usize} task summaries")]
fn project_lists_summaries(world: &AllocationWorld, count: usize) -> Result<(), eyre::Report> {
    let project = world.reload_project()?;
    eyre::ensure!(
        project.tasks().len() == count,
        "expected {count} summaries, found {}",
        project.tasks().len()
    );
    for summary in project.tasks() {
        eyre::ensure!(
            world.created.values().any(|task| task.id() == summary.id),
            "summary {} has no matching task",
            summary.id
        );
    }
    Ok(())
}

#[then("task creation fails because the project was not found")]
fn creation_fails_for_missing_project(world: &AllocationWorld) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected task creation to fail"))?;
    eyre::ensure!(
        matches!(err, TaskLifecycleError::ProjectNotFound(_)),
        "expected project not found, got {err}"
    );
    Ok(())
}
