//! Outbound email for vendor notifications.

use {
    crate::{
        config::SmtpConfig,
        domain::{
            error::PaymentError,
            notification::{EmailMessage, Mailer},
        },
    },
    async_trait::async_trait,
    lettre::{
        AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        message::{Mailbox, header::ContentType},
        transport::smtp::authentication::Credentials,
    },
};

/// Delivers over SMTP with STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, PaymentError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| PaymentError::Mail(format!("invalid sender address: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| PaymentError::Mail(format!("SMTP relay error: {e}")))?
            .port(config.port);

        if let Some((username, password)) = config.credentials() {
            builder = builder.credentials(Credentials::new(username.to_string(), password.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), PaymentError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| PaymentError::Mail(format!("invalid recipient {}: {e}", email.to)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| PaymentError::Mail(format!("failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| PaymentError::Mail(format!("failed to send email: {e}")))?;

        Ok(())
    }
}

/// Used when no SMTP host is configured. Emails only show up in the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), PaymentError> {
        tracing::info!(to = %email.to, subject = %email.subject, "email not sent, SMTP is not configured");
        Ok(())
    }
}
