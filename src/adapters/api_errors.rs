use crate::domain::error::PaymentError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype over the domain error so the HTTP mapping stays in the adapter layer.
#[derive(Debug)]
pub struct ApiError(pub PaymentError);

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PaymentError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PaymentError::Validation(_) | PaymentError::PayoutNotConfigured(_) => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::Unauthorized(_) | PaymentError::WebhookSignature(_) => {
                StatusCode::UNAUTHORIZED
            }
            PaymentError::Forbidden(_) => StatusCode::FORBIDDEN,
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::Gateway(_)
            | PaymentError::Mail(_)
            | PaymentError::Database(_)
            | PaymentError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match &self.0 {
            PaymentError::Validation(msg) => ("validation_error", msg.clone()),
            PaymentError::PayoutNotConfigured(msg) => ("payout_not_configured", msg.clone()),
            PaymentError::Unauthorized(msg) => ("unauthorized", msg.clone()),
            PaymentError::WebhookSignature(_) => {
                ("webhook_error", "invalid webhook signature".to_string())
            }
            PaymentError::Forbidden(msg) => ("forbidden", msg.clone()),
            PaymentError::NotFound(msg) => ("not_found", msg.clone()),
            PaymentError::Gateway(err) => {
                tracing::error!("gateway error: {err}");
                ("gateway_error", "payment gateway request failed".to_string())
            }
            PaymentError::Mail(err) => {
                tracing::error!("mail error: {err}");
                ("internal_error", "internal error".to_string())
            }
            PaymentError::Database(err) => {
                tracing::error!("database error: {err}");
                ("internal_error", "internal error".to_string())
            }
            PaymentError::Serialization(err) => {
                tracing::error!("serialization error: {err}");
                ("internal_error", "internal error".to_string())
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
