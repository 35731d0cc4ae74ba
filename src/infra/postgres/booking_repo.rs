use {
    crate::domain::{
        booking::{Booking, BookingStatus},
        error::PaymentError,
        party::{BookingDetails, ClientProfile, Service, VendorProfile},
    },
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(Debug, sqlx::FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = PaymentError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            client_id: row.client_id,
            service_id: row.service_id,
            event_date: row.event_date,
            location: row.location,
            status: BookingStatus::try_from(row.status.as_str())?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Booking>, PaymentError> {
    sqlx::query_as::<_, BookingRow>(
        r#"
        SELECT id, client_id, service_id, event_date, location, status, created_at, updated_at
        FROM bookings WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .map(Booking::try_from)
    .transpose()
}

/// Conditional update standing in for compare-and-swap: only a PENDING
/// booking is confirmed, so concurrent confirmations collapse into one.
pub async fn confirm_if_pending(pool: &PgPool, id: Uuid) -> Result<bool, PaymentError> {
    let result = sqlx::query(
        r#"
        UPDATE bookings SET status = 'CONFIRMED', updated_at = now()
        WHERE id = $1 AND status = 'PENDING'
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[derive(Debug, sqlx::FromRow)]
struct DetailsRow {
    #[sqlx(flatten)]
    booking: BookingRow,
    service_title: String,
    vendor_id: Uuid,
    vendor_user_id: Uuid,
    vendor_business_name: String,
    vendor_email: String,
    vendor_subaccount_id: Option<String>,
    client_user_id: Uuid,
    client_email: String,
    client_first_name: String,
    client_last_name: String,
    client_phone: Option<String>,
}

pub async fn find_details(pool: &PgPool, id: Uuid) -> Result<Option<BookingDetails>, PaymentError> {
    let row = sqlx::query_as::<_, DetailsRow>(
        r#"
        SELECT b.id, b.client_id, b.service_id, b.event_date, b.location, b.status,
               b.created_at, b.updated_at,
               s.title              AS service_title,
               v.id                 AS vendor_id,
               v.user_id            AS vendor_user_id,
               v.business_name      AS vendor_business_name,
               vu.email             AS vendor_email,
               v.chapa_subaccount_id AS vendor_subaccount_id,
               c.user_id            AS client_user_id,
               cu.email             AS client_email,
               cu.first_name        AS client_first_name,
               cu.last_name         AS client_last_name,
               cu.phone             AS client_phone
        FROM bookings b
        JOIN services s  ON s.id = b.service_id
        JOIN vendors v   ON v.id = s.vendor_id
        JOIN users vu    ON vu.id = v.user_id
        JOIN clients c   ON c.id = b.client_id
        JOIN users cu    ON cu.id = c.user_id
        WHERE b.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let client = ClientProfile {
        id: row.booking.client_id,
        user_id: row.client_user_id,
        email: row.client_email,
        first_name: row.client_first_name,
        last_name: row.client_last_name,
        phone: row.client_phone,
    };
    let service = Service {
        id: row.booking.service_id,
        vendor_id: row.vendor_id,
        title: row.service_title,
    };
    let vendor = VendorProfile {
        id: row.vendor_id,
        user_id: row.vendor_user_id,
        business_name: row.vendor_business_name,
        email: row.vendor_email,
        subaccount_id: row.vendor_subaccount_id,
    };

    Ok(Some(BookingDetails {
        booking: row.booking.try_into()?,
        service,
        vendor,
        client,
    }))
}
