use chrono::{DateTime, Utc};
use identa_core::{AuditAction, AuditLog, AuditStore, AuditStoreError, UserId};
use sqlx::{Pool, Postgres, types::Json};
use uuid::Uuid;

pub struct PostgresAuditStore {
    pool: sqlx::PgPool,
}

impl PostgresAuditStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresAuditStore { pool }
    }
}

#[async_trait::async_trait]
impl AuditStore for PostgresAuditStore {
    #[tracing::instrument(name = "Appending audit log to PostgreSQL", skip_all, fields(action = %log.action))]
    async fn save(&self, log: &AuditLog) -> Result<(), AuditStoreError> {
        sqlx::query(
            r#"
                INSERT INTO audit_logs (id, timestamp, actor_id, action, target_id, metadata)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(log.id)
        .bind(log.timestamp)
        .bind(log.actor_id.as_uuid())
        .bind(log.action.as_str())
        .bind(log.target_id.as_ref().map(UserId::as_uuid))
        .bind(Json(&log.metadata))
        .execute(&self.pool)
        .await
        .map_err(|e| AuditStoreError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving audit trail from PostgreSQL", skip_all)]
    async fn find_by_target(&self, target_id: &UserId) -> Result<Vec<AuditLog>, AuditStoreError> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
                SELECT id, timestamp, actor_id, action, target_id, metadata
                FROM audit_logs
                WHERE target_id = $1
                ORDER BY timestamp DESC
            "#,
        )
        .bind(target_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditStoreError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(AuditRow::into_log).collect()
    }
}

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    timestamp: DateTime<Utc>,
    actor_id: Uuid,
    action: String,
    target_id: Option<Uuid>,
    metadata: Json<serde_json::Value>,
}

impl AuditRow {
    fn into_log(self) -> Result<AuditLog, AuditStoreError> {
        let action = self
            .action
            .parse::<AuditAction>()
            .map_err(AuditStoreError::DatabaseError)?;

        Ok(AuditLog {
            id: self.id,
            timestamp: self.timestamp,
            actor_id: UserId::from(self.actor_id),
            action,
            target_id: self.target_id.map(UserId::from),
            metadata: self.metadata.0,
        })
    }
}
