use {
    crate::domain::{
        error::PaymentError,
        party::{ClientProfile, VendorProfile},
    },
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    user_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct VendorRow {
    id: Uuid,
    user_id: Uuid,
    business_name: String,
    email: String,
    chapa_subaccount_id: Option<String>,
}

pub async fn find_client_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ClientProfile>, PaymentError> {
    let row = sqlx::query_as::<_, ClientRow>(
        r#"
        SELECT c.id, c.user_id, u.email, u.first_name, u.last_name, u.phone
        FROM clients c JOIN users u ON u.id = c.user_id
        WHERE c.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| ClientProfile {
        id: r.id,
        user_id: r.user_id,
        email: r.email,
        first_name: r.first_name,
        last_name: r.last_name,
        phone: r.phone,
    }))
}

pub async fn find_vendor_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<VendorProfile>, PaymentError> {
    let row = sqlx::query_as::<_, VendorRow>(
        r#"
        SELECT v.id, v.user_id, v.business_name, u.email, v.chapa_subaccount_id
        FROM vendors v JOIN users u ON u.id = v.user_id
        WHERE v.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| VendorProfile {
        id: r.id,
        user_id: r.user_id,
        business_name: r.business_name,
        email: r.email,
        subaccount_id: r.chapa_subaccount_id,
    }))
}

/// Oldest admin with a registered payout subaccount.
pub async fn find_admin_subaccount(pool: &PgPool) -> Result<Option<String>, PaymentError> {
    let subaccount = sqlx::query_scalar::<_, String>(
        r#"
        SELECT chapa_subaccount_id FROM admins
        WHERE chapa_subaccount_id IS NOT NULL
        ORDER BY created_at
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(subaccount)
}
