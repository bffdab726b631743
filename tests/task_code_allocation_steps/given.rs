//! Given steps for task code allocation BDD scenarios.

use super::world::{AllocationWorld, run_async};
use eyre::WrapErr;
use labtrack::project::services::CreateProjectRequest;
use labtrack::task::services::CreateTaskRequest;
use rstest_bdd_macros::given;

#[given(r#"a project named "{name}""#)]
fn project_named(world: &mut AllocationWorld, name: String) -> Result<(), eyre::Report> {
    let project = run_async(world.projects.create(CreateProjectRequest::new(name)))
        .wrap_err("create scenario project")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a task titled "{title}" is created in the project"#)]
fn existing_task(world: &mut AllocationWorld, title: String) -> Result<(), eyre::Report> {
    let project_id = world.project_id()?;
    world.create_task(CreateTaskRequest::new(&title).with_project(project_id), &title);
    match world.last_error.take() {
        Some(err) => Err(eyre::eyre!("seed task {title:?} was not created: {err}")),
        None => Ok(()),
    }
}
