//! Shared wiring and store doubles for in-memory integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use labtrack::api::{ApiResponse, AuditHandlers, ProjectHandlers, RequestContext, TaskHandlers};
use labtrack::audit::{
    adapters::memory::{InMemoryAuditLog, InMemoryEntityActivity},
    domain::{AuditEvent, EntityRef, Principal},
    ports::{AuditLogRepository, AuditQuery, AuditRepositoryError, AuditRepositoryResult},
    services::{AuditRecorder, DirectAuditor, TaskAuditInterceptor},
};
use labtrack::config::TrackerConfig;
use labtrack::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, ProjectId, TaskCodePrefix, TaskSummary},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
    services::ProjectLifecycleService,
};
use labtrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskCode, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    services::TaskLifecycleService,
};
use mockable::DefaultClock;
use serde_json::{Value, json};

/// Every handler wired over in-memory entity logs.
pub struct App<T, L, P = InMemoryProjectRepository>
where
    T: TaskRepository + Clone,
    L: AuditLogRepository + Clone,
    P: ProjectRepository + Clone,
{
    pub projects: Arc<P>,
    pub tasks: Arc<T>,
    pub log: Arc<L>,
    pub activity: Arc<InMemoryEntityActivity>,
    pub task_api: TaskHandlers<T, P, DefaultClock, L, InMemoryEntityActivity>,
    pub project_api: ProjectHandlers<P, T, DefaultClock, L, InMemoryEntityActivity>,
    pub audit_api: AuditHandlers<L, InMemoryEntityActivity, DefaultClock>,
}

/// Application over plain in-memory stores.
pub type MemoryApp = App<InMemoryTaskRepository, InMemoryAuditLog>;

impl MemoryApp {
    /// Wires the application with default configuration.
    pub fn in_memory() -> Self {
        Self::with_stores(
            InMemoryTaskRepository::new(),
            InMemoryAuditLog::new(),
            &TrackerConfig::default(),
        )
    }

    /// Returns the whole global log, newest first.
    pub async fn feed(&self) -> Vec<AuditEvent> {
        self.log
            .find(&AuditQuery::latest(usize::MAX))
            .await
            .expect("feed read succeeds")
    }
}

impl<T, L> App<T, L>
where
    T: TaskRepository + Clone,
    L: AuditLogRepository + Clone,
{
    /// Wires the application over the given task store and global log.
    pub fn with_stores(tasks: T, log: L, config: &TrackerConfig) -> Self {
        Self::with_project_store(tasks, log, InMemoryProjectRepository::new(), config)
    }
}

impl<T, L, P> App<T, L, P>
where
    T: TaskRepository + Clone,
    L: AuditLogRepository + Clone,
    P: ProjectRepository + Clone,
{
    /// Wires the application over the given task, project and log stores.
    pub fn with_project_store(tasks: T, log: L, projects: P, config: &TrackerConfig) -> Self {
        let clock = Arc::new(DefaultClock);
        let projects = Arc::new(projects);
        let tasks = Arc::new(tasks);
        let log = Arc::new(log);
        let activity = Arc::new(InMemoryEntityActivity::new());

        let recorder = AuditRecorder::new(Arc::clone(&log), Arc::clone(&activity), &config.audit);
        let task_service = TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&projects),
            Arc::clone(&clock),
            &config.allocation,
        );
        let sync = task_service.summary_sync().clone();
        let interceptor =
            TaskAuditInterceptor::new(Arc::clone(&tasks), recorder.clone(), Arc::clone(&clock));
        let project_auditor =
            DirectAuditor::new(recorder.clone(), Arc::clone(&clock), config.audit.clone());
        let feed_auditor =
            DirectAuditor::new(recorder.clone(), Arc::clone(&clock), config.audit.clone());

        Self {
            task_api: TaskHandlers::new(task_service, interceptor, recorder),
            project_api: ProjectHandlers::new(
                ProjectLifecycleService::new(Arc::clone(&projects), Arc::clone(&clock)),
                sync,
                project_auditor,
            ),
            audit_api: AuditHandlers::new(feed_auditor, config.audit.feed_page_size),
            projects,
            tasks,
            log,
            activity,
        }
    }

    /// Creates a project through the API and returns its identifier.
    pub async fn create_project(&self, name: &str) -> String {
        let response = self
            .project_api
            .create(&signed_in(), &json!({ "name": name }))
            .await;
        assert_eq!(response.status.code(), 201, "project creation: {response:?}");
        id_of(&response)
    }

    /// Creates a task in a project through the API.
    pub async fn create_task(&self, project_id: &str, title: &str) -> ApiResponse {
        self.task_api
            .create(
                &signed_in(),
                &json!({ "title": title, "projectId": project_id }),
            )
            .await
    }

    /// Returns the stored project record.
    pub async fn project(&self, project_id: &str) -> Project {
        let id: ProjectId = project_id.parse().expect("valid project id");
        self.projects
            .find_by_id(id)
            .await
            .expect("project lookup succeeds")
            .expect("project exists")
    }

    /// Returns the cached task summaries of a project.
    pub async fn summaries(&self, project_id: &str) -> Vec<TaskSummary> {
        self.project(project_id).await.tasks().to_vec()
    }
}

/// Request context for the signed-in lab manager used across tests.
pub fn signed_in() -> RequestContext {
    RequestContext::authenticated(Principal::new("u-1", "Ada"))
}

/// Returns the `id` of a JSON response body.
pub fn id_of(response: &ApiResponse) -> String {
    text_of(response, "id")
}

/// Returns a string field of a JSON response body.
pub fn text_of(response: &ApiResponse, key: &str) -> String {
    response
        .body
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| panic!("response has no `{key}`: {response:?}"))
}

/// Task store that yields to the scheduler before every read, widening
/// the window between code allocation and insert.
#[derive(Debug, Clone, Default)]
pub struct YieldingTasks {
    inner: InMemoryTaskRepository,
}

#[async_trait]
impl TaskRepository for YieldingTasks {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        tokio::task::yield_now().await;
        self.inner.store(task).await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.inner.update(task).await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_custom_id(&self, code: &TaskCode) -> TaskRepositoryResult<Option<Task>> {
        tokio::task::yield_now().await;
        self.inner.find_by_custom_id(code).await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.find_by_project(project_id).await
    }

    async fn find_latest_code(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
    ) -> TaskRepositoryResult<Option<TaskCode>> {
        tokio::task::yield_now().await;
        self.inner.find_latest_code(project_id, prefix).await
    }
}

/// Task store where every task code is already taken.
#[derive(Debug, Clone, Default)]
pub struct SaturatedTasks {
    inner: InMemoryTaskRepository,
}

#[async_trait]
impl TaskRepository for SaturatedTasks {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        match task.custom_id() {
            Some(code) => Err(TaskRepositoryError::DuplicateCustomId(code.clone())),
            None => self.inner.store(task).await,
        }
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.inner.update(task).await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_custom_id(&self, code: &TaskCode) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_custom_id(code).await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.find_by_project(project_id).await
    }

    async fn find_latest_code(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
    ) -> TaskRepositoryResult<Option<TaskCode>> {
        self.inner.find_latest_code(project_id, prefix).await
    }
}

/// Project store whose embedded summary writes always fail.
#[derive(Debug, Clone, Default)]
pub struct BrokenSummaryCache {
    inner: InMemoryProjectRepository,
}

fn cache_unavailable() -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other("summary cache unavailable"))
}

#[async_trait]
impl ProjectRepository for BrokenSummaryCache {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        self.inner.store(project).await
    }

    async fn update_details(&self, project: &Project) -> ProjectRepositoryResult<()> {
        self.inner.update_details(project).await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<Project> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.inner.find_by_id(id).await
    }

    async fn push_task_summary(
        &self,
        _project_id: ProjectId,
        _summary: &TaskSummary,
    ) -> ProjectRepositoryResult<()> {
        Err(cache_unavailable())
    }

    async fn replace_task_summary(
        &self,
        _project_id: ProjectId,
        _summary: &TaskSummary,
    ) -> ProjectRepositoryResult<bool> {
        Err(cache_unavailable())
    }

    async fn remove_task_summary(
        &self,
        _project_id: ProjectId,
        _task_id: TaskId,
    ) -> ProjectRepositoryResult<bool> {
        Err(cache_unavailable())
    }

    async fn replace_task_summaries(
        &self,
        _project_id: ProjectId,
        _summaries: &[TaskSummary],
    ) -> ProjectRepositoryResult<()> {
        Err(cache_unavailable())
    }

    async fn record_issued_number(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
        number: u64,
    ) -> ProjectRepositoryResult<()> {
        self.inner
            .record_issued_number(project_id, prefix, number)
            .await
    }
}

/// Global audit log that is permanently unreachable.
#[derive(Debug, Clone, Default)]
pub struct UnavailableAuditLog;

fn unavailable() -> AuditRepositoryError {
    AuditRepositoryError::persistence(std::io::Error::other("audit store unavailable"))
}

#[async_trait]
impl AuditLogRepository for UnavailableAuditLog {
    async fn append(&self, _event: &AuditEvent) -> AuditRepositoryResult<()> {
        Err(unavailable())
    }

    async fn find(&self, _query: &AuditQuery) -> AuditRepositoryResult<Vec<AuditEvent>> {
        Err(unavailable())
    }

    async fn find_by_entity(&self, _entity: &EntityRef) -> AuditRepositoryResult<Vec<AuditEvent>> {
        Err(unavailable())
    }
}
