use {
    super::signature::{self, SIGNATURE_HEADERS},
    crate::{
        AppState,
        domain::{error::PaymentError, gateway::GatewayStatus, id::TxRef},
        services::reconciliation::{WebhookNotice, handle_webhook},
    },
    axum::{
        body::Bytes,
        extract::State,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
    },
    serde::Deserialize,
};

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    tx_ref: String,
    status: GatewayStatus,
}

/// The gateway is the only consumer, so responses are bare status lines.
fn plain(status: StatusCode, text: &'static str) -> Response {
    (status, text).into_response()
}

#[tracing::instrument(
    name = "webhook",
    skip_all,
    fields(tx_ref = tracing::field::Empty)
)]
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(sig) = SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("webhook without signature header");
        return plain(StatusCode::UNAUTHORIZED, "Missing signature");
    };

    if let Err(e) = signature::verify(state.chapa_webhook_secret.as_bytes(), &body, sig) {
        tracing::warn!(error = %e, "webhook signature rejected");
        return plain(StatusCode::UNAUTHORIZED, "Invalid signature");
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable webhook payload");
            return plain(StatusCode::BAD_REQUEST, "Invalid payload");
        }
    };

    let tx_ref = match TxRef::new(payload.tx_ref) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "webhook with invalid tx_ref");
            return plain(StatusCode::BAD_REQUEST, "Invalid payload");
        }
    };

    tracing::Span::current().record("tx_ref", tracing::field::display(&tx_ref));

    let notice = WebhookNotice {
        tx_ref,
        status: payload.status,
    };

    match handle_webhook(&*state.store, &*state.notifier, notice).await {
        Ok(reconciled) => {
            tracing::info!(
                payment_id = %reconciled.payment.id,
                status = %reconciled.payment.status,
                booking_confirmed = reconciled.booking_confirmed,
                "webhook reconciled"
            );
            plain(StatusCode::OK, "OK")
        }
        Err(PaymentError::NotFound(msg)) => {
            tracing::warn!(%msg, "webhook for unknown payment");
            plain(StatusCode::NOT_FOUND, "Payment not found")
        }
        Err(e) => {
            tracing::error!(error = %e, "webhook processing failed");
            plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}
