use {
    sqlx::postgres::PgPoolOptions,
    std::{sync::Arc, time::Duration},
    tokio::{signal, sync::watch},
    tracing_subscriber::EnvFilter,
    wedpay::{
        AppState,
        adapters::{
            chapa::ChapaGateway,
            router,
            smtp::{LogMailer, SmtpMailer},
        },
        config::Config,
        domain::notification::Mailer,
        infra::postgres::{OutboxNotifier, PgStore},
        services::{checkout::CheckoutSettings, notification_worker},
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let gateway = ChapaGateway::new(
        &config.chapa.base_url,
        config.chapa.secret_key.clone(),
        config.chapa.timeout,
    )?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "sending email over SMTP");
            Arc::new(SmtpMailer::new(smtp)?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let state = AppState {
        store: Arc::new(PgStore::new(pool.clone())),
        gateway: Arc::new(gateway),
        notifier: Arc::new(OutboxNotifier::new(pool.clone())),
        checkout: Arc::new(CheckoutSettings {
            currency: config.currency,
            callback_url: config.callback_url.clone(),
            return_url: config.return_url.clone(),
        }),
        chapa_webhook_secret: config.chapa.webhook_secret.as_str().into(),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(notification_worker::run_worker(
        pool.clone(),
        mailer,
        shutdown_rx.clone(),
    ));
    let reaper = tokio::spawn(notification_worker::run_reaper(pool, shutdown_rx));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tx.send(true).ok();
    let _ = tokio::join!(worker, reaper);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
