//! `PostgreSQL` repository implementation for project storage.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::projects,
};
use crate::project::{
    domain::{PersistedProjectData, Project, ProjectId, ProjectName, TaskCodePrefix, TaskSummary},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeMap;

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: ProjectPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }

    /// Runs a mutation against a row-locked project and writes back the
    /// embedded summaries and high-water marks.
    async fn modify<F, T>(&self, id: ProjectId, mutation: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut Project) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(move |connection| modify_locked(connection, id, mutation))
            .await
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_details(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let name = project.name().as_str().to_owned();
        let description = project.description().map(str::to_owned);
        let updated_at = project.updated_at();

        self.run_blocking(move |connection| {
            let updated_count =
                diesel::update(projects::table.filter(projects::id.eq(project_id.into_inner())))
                    .set((
                        projects::name.eq(&name),
                        projects::description.eq(&description),
                        projects::updated_at.eq(updated_at),
                    ))
                    .execute(connection)
                    .map_err(ProjectRepositoryError::persistence)?;

            if updated_count == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<Project> {
        self.run_blocking(move |connection| {
            let row = diesel::delete(projects::table.filter(projects::id.eq(id.into_inner())))
                .returning(ProjectRow::as_returning())
                .get_result::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map_or(Err(ProjectRepositoryError::NotFound(id)), row_to_project)
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn push_task_summary(
        &self,
        project_id: ProjectId,
        summary: &TaskSummary,
    ) -> ProjectRepositoryResult<()> {
        let summary = summary.clone();
        self.modify(project_id, move |project| project.push_task_summary(summary))
            .await
    }

    async fn replace_task_summary(
        &self,
        project_id: ProjectId,
        summary: &TaskSummary,
    ) -> ProjectRepositoryResult<bool> {
        let summary = summary.clone();
        self.modify(project_id, move |project| {
            project.replace_task_summary(summary)
        })
        .await
    }

    async fn remove_task_summary(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> ProjectRepositoryResult<bool> {
        self.modify(project_id, move |project| {
            project.remove_task_summary(task_id)
        })
        .await
    }

    async fn replace_task_summaries(
        &self,
        project_id: ProjectId,
        summaries: &[TaskSummary],
    ) -> ProjectRepositoryResult<()> {
        let summaries = summaries.to_vec();
        self.modify(project_id, move |project| {
            project.replace_task_summaries(summaries);
        })
        .await
    }

    async fn record_issued_number(
        &self,
        project_id: ProjectId,
        prefix: &TaskCodePrefix,
        number: u64,
    ) -> ProjectRepositoryResult<()> {
        let prefix = prefix.clone();
        self.modify(project_id, move |project| {
            project.record_issued(&prefix, number);
        })
        .await
    }
}

/// Error carrier for the row-locking transaction.
enum TransactionError {
    Database(DieselError),
    Repository(ProjectRepositoryError),
}

impl From<DieselError> for TransactionError {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

impl From<TransactionError> for ProjectRepositoryError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Database(db_err) => Self::persistence(db_err),
            TransactionError::Repository(repo_err) => repo_err,
        }
    }
}

fn modify_locked<F, T>(
    connection: &mut PgConnection,
    id: ProjectId,
    mutation: F,
) -> ProjectRepositoryResult<T>
where
    F: FnOnce(&mut Project) -> T,
{
    let outcome = connection.transaction::<T, TransactionError, _>(|tx| {
        let row = projects::table
            .filter(projects::id.eq(id.into_inner()))
            .select(ProjectRow::as_select())
            .for_update()
            .first::<ProjectRow>(tx)
            .optional()?;
        let Some(locked_row) = row else {
            return Err(TransactionError::Repository(
                ProjectRepositoryError::NotFound(id),
            ));
        };

        let mut project = row_to_project(locked_row).map_err(TransactionError::Repository)?;
        let result = mutation(&mut project);
        let tasks = serde_json::to_value(project.tasks())
            .map_err(|err| TransactionError::Repository(ProjectRepositoryError::persistence(err)))?;
        let task_sequences = serde_json::to_value(project.task_sequences())
            .map_err(|err| TransactionError::Repository(ProjectRepositoryError::persistence(err)))?;

        diesel::update(projects::table.filter(projects::id.eq(id.into_inner())))
            .set((
                projects::tasks.eq(tasks),
                projects::task_sequences.eq(task_sequences),
            ))
            .execute(tx)?;
        Ok(result)
    })?;
    Ok(outcome)
}

fn to_new_row(project: &Project) -> ProjectRepositoryResult<NewProjectRow> {
    let tasks = serde_json::to_value(project.tasks()).map_err(ProjectRepositoryError::persistence)?;
    let task_sequences =
        serde_json::to_value(project.task_sequences()).map_err(ProjectRepositoryError::persistence)?;

    Ok(NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().map(str::to_owned),
        tasks,
        task_sequences,
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    })
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        name: persisted_name,
        description,
        tasks: persisted_tasks,
        task_sequences: persisted_sequences,
        created_at,
        updated_at,
    } = row;

    let name = ProjectName::new(persisted_name).map_err(ProjectRepositoryError::persistence)?;
    let tasks = serde_json::from_value::<Vec<TaskSummary>>(persisted_tasks)
        .map_err(ProjectRepositoryError::persistence)?;
    let task_sequences = serde_json::from_value::<BTreeMap<String, u64>>(persisted_sequences)
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(id),
        name,
        description,
        tasks,
        task_sequences,
        created_at,
        updated_at,
    }))
}
