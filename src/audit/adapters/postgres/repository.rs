//! `PostgreSQL` repository implementations for audit storage.

use super::{
    models::{ActivityEntryRow, AuditEventRow},
    schema::{audit_events, entity_activity},
};
use crate::audit::{
    domain::{
        ActivityEntry, ActivityId, ActivityType, Actor, AuditEvent, AuditMeta, EntityKind,
        EntityRef,
    },
    ports::{
        AuditLogRepository, AuditQuery, AuditRepositoryError, AuditRepositoryResult,
        EntityActivityRepository,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::{Map, Value};

/// `PostgreSQL` connection pool type used by audit adapters.
pub type AuditPgPool = Pool<ConnectionManager<PgConnection>>;

async fn run_blocking<F, T>(pool: &AuditPgPool, f: F) -> AuditRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> AuditRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(AuditRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(AuditRepositoryError::persistence)?
}

/// `PostgreSQL`-backed global audit log.
#[derive(Debug, Clone)]
pub struct PostgresAuditLog {
    pool: AuditPgPool,
}

impl PostgresAuditLog {
    /// Creates a new log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AuditPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLog {
    async fn append(&self, event: &AuditEvent) -> AuditRepositoryResult<()> {
        let activity_id = event.id;
        let row = to_event_row(event);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(audit_events::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| duplicate_or_persistence(err, activity_id))?;
            Ok(())
        })
        .await
    }

    async fn find(&self, query: &AuditQuery) -> AuditRepositoryResult<Vec<AuditEvent>> {
        let filter = query.clone();
        run_blocking(&self.pool, move |connection| {
            let mut statement = audit_events::table.into_boxed();
            if let Some(activity_type) = filter.activity_type {
                statement = statement.filter(audit_events::activity_type.eq(activity_type.as_str()));
            }
            if let Some(entity) = filter.entity {
                statement = statement
                    .filter(audit_events::entity_kind.eq(entity.kind.as_str()))
                    .filter(audit_events::entity_id.eq(entity.id));
            }
            let rows = statement
                .order((audit_events::created_at.desc(), audit_events::seq.desc()))
                .limit(to_sql_count(filter.limit))
                .offset(to_sql_count(filter.skip))
                .select(AuditEventRow::as_select())
                .load::<AuditEventRow>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }

    async fn find_by_entity(&self, entity: &EntityRef) -> AuditRepositoryResult<Vec<AuditEvent>> {
        let kind = entity.kind.as_str();
        let entity_id = entity.id.clone();
        run_blocking(&self.pool, move |connection| {
            let rows = audit_events::table
                .filter(audit_events::entity_kind.eq(kind))
                .filter(audit_events::entity_id.eq(entity_id))
                .order((audit_events::created_at.asc(), audit_events::seq.asc()))
                .select(AuditEventRow::as_select())
                .load::<AuditEventRow>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            rows.into_iter().map(row_to_event).collect()
        })
        .await
    }
}

/// `PostgreSQL`-backed entity activity logs.
#[derive(Debug, Clone)]
pub struct PostgresEntityActivity {
    pool: AuditPgPool,
}

impl PostgresEntityActivity {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AuditPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityActivityRepository for PostgresEntityActivity {
    async fn append(
        &self,
        entity: &EntityRef,
        entry: &ActivityEntry,
    ) -> AuditRepositoryResult<()> {
        let activity_id = entry.id;
        let row = to_entry_row(entity, entry);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(entity_activity::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| duplicate_or_persistence(err, activity_id))?;
            Ok(())
        })
        .await
    }

    async fn list(&self, entity: &EntityRef) -> AuditRepositoryResult<Vec<ActivityEntry>> {
        let kind = entity.kind.as_str();
        let entity_id = entity.id.clone();
        run_blocking(&self.pool, move |connection| {
            let rows = entity_activity::table
                .filter(entity_activity::entity_kind.eq(kind))
                .filter(entity_activity::entity_id.eq(entity_id))
                .order(entity_activity::seq.asc())
                .select(ActivityEntryRow::as_select())
                .load::<ActivityEntryRow>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }

    async fn replace(
        &self,
        entity: &EntityRef,
        entries: &[ActivityEntry],
    ) -> AuditRepositoryResult<()> {
        let kind = entity.kind.as_str();
        let entity_id = entity.id.clone();
        let rows: Vec<ActivityEntryRow> = entries
            .iter()
            .map(|entry| to_entry_row(entity, entry))
            .collect();
        run_blocking(&self.pool, move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::delete(
                        entity_activity::table
                            .filter(entity_activity::entity_kind.eq(kind))
                            .filter(entity_activity::entity_id.eq(&entity_id)),
                    )
                    .execute(tx)?;
                    if !rows.is_empty() {
                        diesel::insert_into(entity_activity::table)
                            .values(&rows)
                            .execute(tx)?;
                    }
                    Ok(())
                })
                .map_err(AuditRepositoryError::persistence)
        })
        .await
    }
}

fn to_sql_count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn duplicate_or_persistence(err: DieselError, activity_id: ActivityId) -> AuditRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AuditRepositoryError::DuplicateActivity(activity_id)
        }
        other => AuditRepositoryError::persistence(other),
    }
}

fn to_event_row(event: &AuditEvent) -> AuditEventRow {
    AuditEventRow {
        id: event.id.into_inner(),
        activity_type: event.activity_type.as_str().to_owned(),
        description: event.description.clone(),
        user_id: event.user.id.clone(),
        user_name: event.user.name.clone(),
        entity_kind: event.meta.entity_kind.as_str().to_owned(),
        entity_id: event.meta.entity_id.clone(),
        entity_title: event.meta.entity_title.clone(),
        operation: event.meta.operation.clone(),
        details: Value::Object(event.meta.details.clone()),
        created_at: event.created_at,
    }
}

fn row_to_event(row: AuditEventRow) -> AuditRepositoryResult<AuditEvent> {
    let activity_type = ActivityType::try_from(row.activity_type.as_str())
        .map_err(AuditRepositoryError::persistence)?;
    let entity_kind =
        EntityKind::try_from(row.entity_kind.as_str()).map_err(AuditRepositoryError::persistence)?;
    Ok(AuditEvent {
        id: ActivityId::from_uuid(row.id),
        activity_type,
        description: row.description,
        user: Actor::new(row.user_id, row.user_name),
        meta: AuditMeta {
            entity_kind,
            entity_id: row.entity_id,
            entity_title: row.entity_title,
            operation: row.operation,
            details: into_object(row.details),
        },
        created_at: row.created_at,
    })
}

fn to_entry_row(entity: &EntityRef, entry: &ActivityEntry) -> ActivityEntryRow {
    ActivityEntryRow {
        entity_kind: entity.kind.as_str().to_owned(),
        entity_id: entity.id.clone(),
        id: entry.id.into_inner(),
        user_id: entry.user_id.clone(),
        action: entry.action.as_str().to_owned(),
        timestamp: entry.timestamp,
        details: entry.details.clone(),
        user_name: entry.user.clone(),
    }
}

fn row_to_entry(row: ActivityEntryRow) -> AuditRepositoryResult<ActivityEntry> {
    let action =
        ActivityType::try_from(row.action.as_str()).map_err(AuditRepositoryError::persistence)?;
    Ok(ActivityEntry {
        id: ActivityId::from_uuid(row.id),
        user_id: row.user_id,
        action,
        timestamp: row.timestamp,
        details: row.details,
        user: row.user_name,
    })
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
