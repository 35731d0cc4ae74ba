use {
    crate::domain::{
        error::PaymentError,
        id::TxRef,
        money::{Currency, MoneyAmount},
        payment::{NewPayment, Payment, PaymentFilter, PaymentMethod, PaymentStatus},
    },
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

const PAYMENT_COLUMNS: &str = "id, amount, currency, status, method, tx_ref, user_id, \
     recipient_id, booking_id, admin_amount, vendor_amount, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub method: String,
    pub tx_ref: Option<String>,
    pub user_id: Uuid,
    pub recipient_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub admin_amount: i64,
    pub vendor_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = PaymentError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            amount: MoneyAmount::new(row.amount)?,
            currency: Currency::try_from(row.currency.as_str())?,
            status: PaymentStatus::try_from(row.status.as_str())?,
            method: PaymentMethod::try_from(row.method.as_str())?,
            tx_ref: row.tx_ref.map(TxRef::from_stored),
            user_id: row.user_id,
            recipient_id: row.recipient_id,
            booking_id: row.booking_id,
            admin_amount: MoneyAmount::new(row.admin_amount)?,
            vendor_amount: MoneyAmount::new(row.vendor_amount)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub async fn insert_payment(pool: &PgPool, payment: &NewPayment) -> Result<Payment, PaymentError> {
    let split = payment.split();
    let sql = format!(
        r#"
        INSERT INTO payments
            (id, amount, currency, status, method, user_id, recipient_id,
             booking_id, admin_amount, vendor_amount)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {PAYMENT_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(payment.id())
        .bind(payment.amount().minor_units())
        .bind(payment.currency().as_str())
        .bind(payment.status().as_str())
        .bind(payment.method().as_str())
        .bind(payment.user_id())
        .bind(payment.recipient_id())
        .bind(payment.booking_id())
        .bind(split.admin.minor_units())
        .bind(split.vendor.minor_units())
        .fetch_one(pool)
        .await?;

    row.try_into()
}

pub async fn set_tx_ref(pool: &PgPool, id: Uuid, tx_ref: &TxRef) -> Result<(), PaymentError> {
    let result = sqlx::query("UPDATE payments SET tx_ref = $1, updated_at = now() WHERE id = $2")
        .bind(tx_ref.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PaymentError::NotFound(format!("payment {id}")));
    }
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Payment>, PaymentError> {
    let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");
    sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(Payment::try_from)
        .transpose()
}

pub async fn find_by_tx_ref(pool: &PgPool, tx_ref: &TxRef) -> Result<Option<Payment>, PaymentError> {
    let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE tx_ref = $1");
    sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(tx_ref.as_str())
        .fetch_optional(pool)
        .await?
        .map(Payment::try_from)
        .transpose()
}

/// Overwrites status even when it is unchanged; the gateway is authoritative.
pub async fn write_status(
    pool: &PgPool,
    id: Uuid,
    status: PaymentStatus,
) -> Result<Payment, PaymentError> {
    let sql = format!(
        "UPDATE payments SET status = $1, updated_at = now() WHERE id = $2 RETURNING {PAYMENT_COLUMNS}"
    );
    sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("payment {id}")))?
        .try_into()
}

/// Payments where the user is payer or recipient, newest first.
pub async fn list(pool: &PgPool, filter: &PaymentFilter) -> Result<(Vec<Payment>, i64), PaymentError> {
    let status = filter.status.map(|s| s.as_str());

    let sql = format!(
        r#"
        SELECT {PAYMENT_COLUMNS} FROM payments
        WHERE (user_id = $1 OR recipient_id = $1)
          AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC, id DESC
        LIMIT $3 OFFSET $4
        "#
    );
    let rows = sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(filter.user_id)
        .bind(status)
        .bind(i64::from(filter.limit))
        .bind(filter.offset())
        .fetch_all(pool)
        .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM payments
        WHERE (user_id = $1 OR recipient_id = $1)
          AND ($2::text IS NULL OR status = $2)
        "#,
    )
    .bind(filter.user_id)
    .bind(status)
    .fetch_one(pool)
    .await?;

    let payments = rows
        .into_iter()
        .map(Payment::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((payments, total))
}
