//! When steps for task code allocation BDD scenarios.

use super::world::{AllocationWorld, run_async};
use eyre::WrapErr;
use labtrack::project::domain::ProjectId;
use labtrack::task::services::CreateTaskRequest;
use rstest_bdd_macros::when;

#[when(r#"a task titled "{title}" is created in the project"#)]
fn task_created_in_project(world: &mut AllocationWorld, title: String) -> Result<(), eyre::Report> {
    let project_id = world.project_id()?;
    world.create_task(CreateTaskRequest::new(&title).with_project(project_id), &title);
    Ok(())
}

#[when(r#"a task titled "{title}" is created without a project"#)]
fn task_created_unscoped(world: &mut AllocationWorld, title: String) {
    world.create_task(CreateTaskRequest::new(&title), &title);
}

#[when(r#"a task titled "{title}" is created in a project that does not exist"#)]
fn task_created_in_missing_project(world: &mut AllocationWorld, title: String) {
    world.create_task(
        CreateTaskRequest::new(&title).with_project(ProjectId::new()),
        &title,
    );
}

#[when(r#"the task titled "{title}" is deleted"#)]
fn task_deleted(world: &mut AllocationWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id();
    run_async(world.tasks.delete(task_id)).wrap_err("delete scenario task")?;
    world.created.remove(&title);
    Ok(())
}
