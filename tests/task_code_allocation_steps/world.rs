//! Shared world state for task code allocation BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use eyre::WrapErr;
use labtrack::config::AllocationConfig;
use labtrack::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, ProjectId},
    services::ProjectLifecycleService,
};
use labtrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Task service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryProjectRepository, DefaultClock>;

/// Project service type used by the BDD world.
pub type TestProjectService = ProjectLifecycleService<InMemoryProjectRepository, DefaultClock>;

/// Scenario world for task code allocation behaviour tests.
pub struct AllocationWorld {
    pub tasks: TestTaskService,
    pub projects: TestProjectService,
    pub project: Option<Project>,
    pub created: HashMap<String, Task>,
    pub last_error: Option<TaskLifecycleError>,
}

impl AllocationWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let project_store = Arc::new(InMemoryProjectRepository::new());
        Self {
            tasks: TaskLifecycleService::new(
                Arc::new(InMemoryTaskRepository::new()),
                Arc::clone(&project_store),
                Arc::clone(&clock),
                &AllocationConfig::default(),
            ),
            projects: ProjectLifecycleService::new(project_store, clock),
            project: None,
            created: HashMap::new(),
            last_error: None,
        }
    }

    /// Returns the identifier of the scenario project.
    ///
    /// # Errors
    ///
    /// Returns an error when no project was set up.
    pub fn project_id(&self) -> Result<ProjectId, eyre::Report> {
        self.project
            .as_ref()
            .map(Project::id)
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Creates a task and remembers it by title, or records the failure in
    /// `last_error`.
    pub fn create_task(&mut self, request: CreateTaskRequest, title: &str) {
        match run_async(self.tasks.create(request)) {
            Ok(task) => {
                self.created.insert(title.to_owned(), task);
            }
            Err(err) => self.last_error = Some(err),
        }
    }

    /// Returns a previously created task by title.
    ///
    /// # Errors
    ///
    /// Returns an error when no task with that title was created.
    pub fn task(&self, title: &str) -> Result<&Task, eyre::Report> {
        self.created
            .get(title)
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} was created"))
    }

    /// Re-reads the scenario project from the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the project cannot be loaded.
    pub fn reload_project(&self) -> Result<Project, eyre::Report> {
        let id = self.project_id()?;
        run_async(self.projects.find(id)).wrap_err("reload scenario project")
    }
}

impl Default for AllocationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AllocationWorld {
    AllocationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
