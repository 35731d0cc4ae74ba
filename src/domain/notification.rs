use {
    super::error::PaymentError,
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

/// Vendor-facing notification, persisted as JSON in the outbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    PaymentCompleted {
        vendor_email: String,
        vendor_name: String,
        payment_id: Uuid,
        amount: String,
        vendor_amount: String,
        currency: String,
        tx_ref: Option<String>,
        service_title: Option<String>,
        event_date: Option<DateTime<Utc>>,
    },
    NewBooking {
        vendor_email: String,
        vendor_name: String,
        booking_id: Uuid,
        service_title: String,
        client_name: String,
        event_date: DateTime<Utc>,
        location: String,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PaymentCompleted { .. } => "payment_completed",
            Self::NewBooking { .. } => "new_booking",
        }
    }

    pub fn render(&self) -> EmailMessage {
        match self {
            Self::PaymentCompleted {
                vendor_email,
                vendor_name,
                payment_id,
                amount,
                vendor_amount,
                currency,
                tx_ref,
                service_title,
                event_date,
            } => {
                let service = service_title.as_deref().unwrap_or("your service");
                let date = event_date
                    .map(|d| d.format("%B %-d, %Y").to_string())
                    .unwrap_or_else(|| "-".to_string());
                let reference = tx_ref.as_deref().unwrap_or("-");
                EmailMessage {
                    to: vendor_email.clone(),
                    subject: format!("Payment received for {service}"),
                    html: format!(
                        r#"<p>Hello {vendor_name},</p>
<p>A payment of <strong>{amount} {currency}</strong> for <em>{service}</em> has been completed.</p>
<ul>
  <li>Your share: {vendor_amount} {currency}</li>
  <li>Event date: {date}</li>
  <li>Payment: {payment_id}</li>
  <li>Reference: {reference}</li>
</ul>"#
                    ),
                }
            }
            Self::NewBooking {
                vendor_email,
                vendor_name,
                booking_id,
                service_title,
                client_name,
                event_date,
                location,
            } => EmailMessage {
                to: vendor_email.clone(),
                subject: format!("New booking: {service_title}"),
                html: format!(
                    r#"<p>Hello {vendor_name},</p>
<p>{client_name} has booked <em>{service_title}</em>.</p>
<ul>
  <li>Date: {date}</li>
  <li>Location: {location}</li>
  <li>Booking: {booking_id}</li>
</ul>"#,
                    date = event_date.format("%B %-d, %Y"),
                ),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Hands notifications off for delivery. Callers treat failures as non-fatal.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), PaymentError>;
}

/// Email transport used by the notification worker.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), PaymentError>;
}
