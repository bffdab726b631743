//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{TaskCodeRow, TaskRecord, TaskRow},
    schema::tasks,
};
use crate::project::domain::{ProjectId, TaskCodePrefix};
use crate::task::{
    domain::{PersistedTaskData, Progress, Task, TaskCode, TaskId, TaskPriority, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

const CUSTOM_ID_UNIQUE_INDEX: &str = "idx_tasks_custom_id_unique";

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let custom_id = task.custom_id().cloned();
        let record = to_record(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match (err, custom_id) {
                    (
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info),
                        Some(code),
                    ) if is_custom_id_unique_violation(info.as_ref()) => {
                        TaskRepositoryError::DuplicateCustomId(code)
                    }
                    (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    (other, _) => TaskRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let record = to_record(task);

        self.run_blocking(move |connection| {
            let updated_count =
                diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&record)
                    .execute(connection)
                    .map_err(TaskRepositoryError::persistence)?;

            if updated_count == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            let row = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map_or(Err(TaskRepositoryError::NotFound(id)), row_to_task)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_custom_id(&self, code: &TaskCode) -> TaskRepositoryResult<Option<Task>> {
        let lookup = code.to_string();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::custom_id.eq(&lookup))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_latest_code(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
    ) -> TaskRepositoryResult<Option<TaskCode>> {
        let pattern = prefix.code_pattern();
        self.run_blocking(move |connection| {
            // Order numerically: a text sort would rank `BP-9` above `BP-10`.
            let query = diesel::sql_query(concat!(
                "SELECT custom_id FROM tasks ",
                "WHERE project_id = $1 AND custom_id ~ $2 ",
                "ORDER BY substring(custom_id FROM '([0-9]+)$')::NUMERIC DESC ",
                "LIMIT 1",
            ))
            .bind::<diesel::sql_types::Uuid, _>(project_id.into_inner())
            .bind::<diesel::sql_types::Text, _>(&pattern);

            let row = query
                .get_result::<TaskCodeRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(|code_row| {
                code_row
                    .custom_id
                    .parse::<TaskCode>()
                    .map_err(TaskRepositoryError::persistence)
            })
            .transpose()
        })
        .await
    }
}

fn to_record(task: &Task) -> TaskRecord {
    TaskRecord {
        id: task.id().into_inner(),
        custom_id: task.custom_id().map(ToString::to_string),
        project_id: task.project_id().map(ProjectId::into_inner),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        assignee: task.assignee().map(str::to_owned),
        due_date: task.due_date(),
        progress: i16::from(task.progress().value()),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        custom_id: persisted_code,
        project_id,
        title,
        description,
        status: persisted_status,
        priority: persisted_priority,
        assignee,
        due_date,
        progress: persisted_progress,
        created_at,
        updated_at,
    } = row;

    let custom_id = persisted_code
        .map(|code| code.parse::<TaskCode>())
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let progress = u64::try_from(persisted_progress)
        .map_err(TaskRepositoryError::persistence)
        .and_then(|value| Progress::new(value).map_err(TaskRepositoryError::persistence))?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        custom_id,
        project_id: project_id.map(ProjectId::from_uuid),
        title,
        description,
        status,
        priority,
        assignee,
        due_date,
        progress,
        created_at,
        updated_at,
    }))
}

fn is_custom_id_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == CUSTOM_ID_UNIQUE_INDEX)
}
