use {
    crate::domain::{
        error::PaymentError,
        notification::{Notification, Notifier},
    },
    async_trait::async_trait,
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(Debug, sqlx::FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub attempts: i32,
}

/// Append a notification to the outbox.
pub async fn enqueue(pool: &PgPool, notification: &Notification) -> Result<Uuid, PaymentError> {
    let id = Uuid::now_v7();
    let payload = serde_json::to_value(notification)?;

    sqlx::query(
        r#"
        INSERT INTO notification_jobs (id, kind, payload)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(id)
    .bind(notification.kind())
    .bind(&payload)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Claim up to `limit` pending jobs for processing.
/// Uses SKIP LOCKED to avoid contention with other workers.
pub async fn claim(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    limit: i64,
) -> Result<Vec<JobRow>, PaymentError> {
    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE notification_jobs
        SET status = 'processing', updated_at = now()
        WHERE id IN (
            SELECT id FROM notification_jobs
            WHERE status = 'pending' AND scheduled_at <= now()
            ORDER BY scheduled_at
            LIMIT $1
            FOR UPDATE SKIP LOCKED
        )
        RETURNING id, kind, payload, attempts
        "#,
    )
    .bind(limit)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows)
}

pub async fn complete(pool: &PgPool, id: Uuid) -> Result<(), PaymentError> {
    sqlx::query(
        "UPDATE notification_jobs SET status = 'completed', updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Record a failure. Exponential backoff via scheduled_at.
/// If max attempts reached, mark as 'failed' permanently.
pub async fn fail(pool: &PgPool, id: Uuid, error: &str) -> Result<(), PaymentError> {
    sqlx::query(
        r#"
        UPDATE notification_jobs
        SET attempts = attempts + 1,
            last_error = $2,
            status = CASE
                WHEN attempts + 1 >= max_attempts THEN 'failed'
                ELSE 'pending'
            END,
            scheduled_at = CASE
                WHEN attempts + 1 >= max_attempts THEN scheduled_at
                ELSE now() + make_interval(secs => power(2, attempts + 1)::int)
            END,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(error)
    .execute(pool)
    .await?;
    Ok(())
}

/// Reset jobs stuck in 'processing' for >2 minutes back to 'pending'.
pub async fn reap_stale(pool: &PgPool) -> Result<u64, PaymentError> {
    let result = sqlx::query(
        r#"
        UPDATE notification_jobs
        SET status = 'pending', updated_at = now()
        WHERE status = 'processing' AND updated_at < now() - interval '2 minutes'
        "#,
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// `Notifier` that writes to the outbox; delivery happens in the worker.
#[derive(Clone)]
pub struct OutboxNotifier {
    pool: PgPool,
}

impl OutboxNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), PaymentError> {
        let job_id = enqueue(&self.pool, &notification).await?;
        tracing::debug!(%job_id, kind = notification.kind(), "notification enqueued");
        Ok(())
    }
}
