use {
    crate::domain::{
        error::PaymentError,
        gateway::{CheckoutRequest, PaymentGateway, SplitInstruction},
        id::TxRef,
        money::{Currency, MoneyAmount, Split},
        payment::{NewPayment, NewPaymentParams, PaymentStatus},
        store::MarketStore,
    },
    uuid::Uuid,
};

const CHECKOUT_TITLE: &str = "Wedding Booking";

/// Fixed per deployment: where the gateway sends the payer and the callback.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub currency: Currency,
    pub callback_url: String,
    pub return_url: String,
}

#[derive(Debug)]
pub struct InitiatePayment {
    pub amount: MoneyAmount,
    pub vendor_id: Uuid,
    pub booking_id: Uuid,
}

#[derive(Debug)]
pub struct InitiatedPayment {
    pub payment_id: Uuid,
    pub tx_ref: TxRef,
    pub checkout_url: String,
}

/// Create a PENDING payment for the caller's booking and open a hosted
/// checkout session for it. Every check runs before the first write.
pub async fn initiate_payment(
    store: &dyn MarketStore,
    gateway: &dyn PaymentGateway,
    settings: &CheckoutSettings,
    caller: Uuid,
    request: InitiatePayment,
) -> Result<InitiatedPayment, PaymentError> {
    if request.amount.is_zero() {
        return Err(PaymentError::Validation("amount must be greater than zero".into()));
    }

    let client = store
        .find_client_by_user(caller)
        .await?
        .ok_or_else(|| PaymentError::NotFound("client profile not found".into()))?;

    let details = store
        .find_booking_details(request.booking_id)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("booking {}", request.booking_id)))?;

    if details.booking.client_id != client.id {
        return Err(PaymentError::Forbidden(
            "booking does not belong to this client".into(),
        ));
    }
    if details.service.vendor_id != request.vendor_id {
        return Err(PaymentError::Validation(
            "service does not belong to this vendor".into(),
        ));
    }

    let vendor_subaccount = details.vendor.subaccount_id.clone().ok_or_else(|| {
        PaymentError::PayoutNotConfigured("vendor has no payout subaccount".into())
    })?;
    let admin_subaccount = store.find_admin_subaccount().await?.ok_or_else(|| {
        PaymentError::PayoutNotConfigured("platform admin has no payout subaccount".into())
    })?;

    let new_payment = NewPayment::new(NewPaymentParams {
        amount: request.amount,
        currency: settings.currency,
        user_id: caller,
        recipient_id: details.vendor.user_id,
        booking_id: Some(details.booking.id),
    });
    let payment = store.insert_payment(&new_payment).await?;
    if let Err(e) = store
        .insert_audit_entry(&payment.audit_entry(&format!("user:{caller}"), "created"))
        .await
    {
        tracing::error!(payment_id = %payment.id, error = %e, "failed to audit payment creation");
    }

    let tx_ref = TxRef::generate();
    let checkout = CheckoutRequest {
        amount: payment.amount,
        currency: payment.currency,
        email: client.email.clone(),
        first_name: client.first_name.clone(),
        last_name: client.last_name.clone(),
        phone_number: client.phone.clone(),
        tx_ref: tx_ref.clone(),
        callback_url: settings.callback_url.clone(),
        return_url: settings.return_url.clone(),
        title: CHECKOUT_TITLE.to_string(),
        description: format!("Payment for {}", details.service.title),
        splits: vec![
            SplitInstruction {
                subaccount_id: vendor_subaccount,
                fraction: Split::vendor_fraction(),
            },
            SplitInstruction {
                subaccount_id: admin_subaccount,
                fraction: Split::admin_fraction(),
            },
        ],
    };

    let session = match gateway.initialize(&checkout).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(payment_id = %payment.id, error = %e, "checkout initialization failed");
            mark_failed(store, payment.id, &e).await;
            return Err(e);
        }
    };

    // Without the stored reference the webhook can never match this
    // checkout session, so the row is retired.
    if let Err(e) = store.set_tx_ref(payment.id, &tx_ref).await {
        tracing::error!(payment_id = %payment.id, %tx_ref, error = %e, "failed to store tx_ref after checkout");
        mark_failed(store, payment.id, &e).await;
        return Err(e);
    }
    tracing::info!(payment_id = %payment.id, %tx_ref, amount = %payment.amount, "checkout initialized");

    Ok(InitiatedPayment {
        payment_id: payment.id,
        tx_ref,
        checkout_url: session.checkout_url,
    })
}

/// The payment row stays behind as FAILED; the original error is what the
/// caller sees, so a failure here is only logged.
async fn mark_failed(store: &dyn MarketStore, payment_id: Uuid, cause: &PaymentError) {
    match store.write_status(payment_id, PaymentStatus::Failed).await {
        Ok(payment) => {
            let mut audit = payment.audit_entry("system", "checkout_failed");
            audit.detail = serde_json::json!({ "error": cause.to_string() });
            if let Err(e) = store.insert_audit_entry(&audit).await {
                tracing::error!(%payment_id, error = %e, "failed to audit checkout failure");
            }
        }
        Err(e) => {
            tracing::error!(%payment_id, error = %e, "failed to mark payment as FAILED");
        }
    }
}
