use {
    super::{api_errors::ApiError, auth::AuthUser},
    crate::{
        AppState,
        domain::{
            booking::Booking,
            error::PaymentError,
            id::TxRef,
            money::MoneyAmount,
            payment::{Payment, PaymentStatus},
        },
        services::{
            checkout::{InitiatePayment, initiate_payment},
            payment_queries::{ListParams, PaymentPage, get_payment, list_payments},
            reconciliation::{VerifyPayment, verify_payment},
        },
    },
    axum::{
        Json,
        extract::{Path, Query, State, rejection::JsonRejection},
        http::StatusCode,
    },
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateBody {
    amount: Option<MoneyAmount>,
    vendor_id: Option<Uuid>,
    booking_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateResponse {
    message: &'static str,
    checkout_url: String,
    payment_id: Uuid,
    tx_ref: TxRef,
}

#[tracing::instrument(
    name = "initiate_payment",
    skip_all,
    fields(user_id = %user.0, booking_id = tracing::field::Empty)
)]
pub async fn initiate_handler(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<InitiateBody>, JsonRejection>,
) -> Result<(StatusCode, Json<InitiateResponse>), ApiError> {
    let Json(body) = body?;
    let (Some(amount), Some(vendor_id), Some(booking_id)) =
        (body.amount, body.vendor_id, body.booking_id)
    else {
        return Err(PaymentError::Validation(
            "amount, vendorId and bookingId are required".into(),
        )
        .into());
    };

    tracing::Span::current().record("booking_id", tracing::field::display(booking_id));

    let initiated = initiate_payment(
        &*state.store,
        &*state.gateway,
        &state.checkout,
        user.0,
        InitiatePayment {
            amount,
            vendor_id,
            booking_id,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(InitiateResponse {
            message: "Payment initiated",
            checkout_url: initiated.checkout_url,
            payment_id: initiated.payment_id,
            tx_ref: initiated.tx_ref,
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
    payment_id: Option<Uuid>,
    #[serde(rename = "tx_ref", alias = "txRef")]
    tx_ref: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    message: &'static str,
    payment_id: Uuid,
    status: PaymentStatus,
    amount: MoneyAmount,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    booking: Option<Booking>,
    chapa_data: serde_json::Value,
}

#[tracing::instrument(
    name = "verify_payment",
    skip_all,
    fields(user_id = %user.0, payment_id = tracing::field::Empty)
)]
pub async fn verify_handler(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<VerifyBody>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Json(body) = body?;
    let (Some(payment_id), Some(tx_ref)) = (body.payment_id, body.tx_ref) else {
        return Err(PaymentError::Validation("paymentId and tx_ref are required".into()).into());
    };
    let tx_ref = TxRef::new(tx_ref)?;

    tracing::Span::current().record("payment_id", tracing::field::display(payment_id));

    let verification = verify_payment(
        &*state.store,
        &*state.gateway,
        &*state.notifier,
        user.0,
        VerifyPayment { payment_id, tx_ref },
    )
    .await?;

    let payment = verification.reconciled.payment;
    Ok(Json(VerifyResponse {
        message: "Payment verification completed",
        payment_id: payment.id,
        status: payment.status,
        amount: payment.amount,
        created_at: payment.created_at,
        updated_at: payment.updated_at,
        booking: verification.reconciled.booking,
        chapa_data: verification.gateway_data,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

pub async fn list_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaymentPage>, ApiError> {
    let page = list_payments(
        &*state.store,
        user.0,
        ListParams {
            status: query.status,
            page: query.page,
            limit: query.limit,
        },
    )
    .await?;

    Ok(Json(page))
}

pub async fn get_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Payment>, ApiError> {
    let payment = get_payment(&*state.store, user.0, payment_id).await?;
    Ok(Json(payment))
}
