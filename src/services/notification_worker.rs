use {
    crate::domain::{
        error::PaymentError,
        notification::{Mailer, Notification},
    },
    crate::infra::postgres::notification_repo,
    sqlx::PgPool,
    std::{sync::Arc, time::Duration},
    tokio::sync::watch,
};

const BATCH_SIZE: i64 = 10;

/// Poll the outbox and deliver pending notifications.
pub async fn run_worker(pool: PgPool, mailer: Arc<dyn Mailer>, mut shutdown: watch::Receiver<bool>) {
    tracing::info!("notification worker started");

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                tracing::info!("notification worker shutting down");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
        }

        if let Err(e) = poll_once(&pool, &*mailer).await {
            tracing::error!(error = %e, "notification worker poll error");
        }
    }
}

async fn poll_once(pool: &PgPool, mailer: &dyn Mailer) -> Result<(), PaymentError> {
    let mut tx = pool.begin().await?;
    let jobs = notification_repo::claim(&mut tx, BATCH_SIZE).await?;
    tx.commit().await?;

    for job in jobs {
        let notification: Notification = match serde_json::from_value(job.payload) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(job_id = %job.id, kind = %job.kind, error = %e, "unreadable payload, completing as garbage");
                notification_repo::complete(pool, job.id).await?;
                continue;
            }
        };

        match deliver(mailer, &notification).await {
            Ok(()) => {
                tracing::info!(job_id = %job.id, kind = %job.kind, "notification delivered");
                notification_repo::complete(pool, job.id).await?;
            }
            Err(e) => {
                tracing::error!(job_id = %job.id, attempts = job.attempts, error = %e, "delivery failed, scheduling retry");
                notification_repo::fail(pool, job.id, &e.to_string()).await?;
            }
        }
    }

    Ok(())
}

/// Render and send one notification.
pub async fn deliver(mailer: &dyn Mailer, notification: &Notification) -> Result<(), PaymentError> {
    let email = notification.render();
    mailer.send(&email).await
}

/// Periodically reset jobs stuck in 'processing' back to 'pending'.
pub async fn run_reaper(pool: PgPool, mut shutdown: watch::Receiver<bool>) {
    tracing::info!("stale notification reaper started");

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                tracing::info!("stale notification reaper shutting down");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(60)) => {}
        }

        match notification_repo::reap_stale(&pool).await {
            Ok(0) => {}
            Ok(n) => tracing::info!(count = n, "reaped stale notification jobs"),
            Err(e) => tracing::error!(error = %e, "reaper error"),
        }
    }
}
