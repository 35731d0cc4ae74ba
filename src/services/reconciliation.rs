use {
    crate::domain::{
        booking::Booking,
        error::PaymentError,
        gateway::{GatewayStatus, PaymentGateway},
        id::TxRef,
        notification::{Notification, Notifier},
        payment::{Payment, PaymentStatus},
        store::MarketStore,
    },
    uuid::Uuid,
};

/// Who triggered a reconciliation. Recorded in logs and the audit trail.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    Poll { caller: Uuid },
    Webhook,
}

impl Trigger {
    fn actor(&self) -> String {
        match self {
            Self::Poll { caller } => format!("poll:{caller}"),
            Self::Webhook => "webhook:chapa".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Reconciled {
    pub payment: Payment,
    pub booking: Option<Booking>,
    /// The booking moved PENDING -> CONFIRMED during this call.
    pub booking_confirmed: bool,
    pub notifications_sent: usize,
}

#[derive(Debug)]
pub struct VerifyPayment {
    pub payment_id: Uuid,
    pub tx_ref: TxRef,
}

#[derive(Debug)]
pub struct Verification {
    pub reconciled: Reconciled,
    pub gateway_data: serde_json::Value,
}

#[derive(Debug)]
pub struct WebhookNotice {
    pub tx_ref: TxRef,
    pub status: GatewayStatus,
}

/// Poll path: the payer asks us to check the gateway for their payment.
pub async fn verify_payment(
    store: &dyn MarketStore,
    gateway: &dyn PaymentGateway,
    notifier: &dyn Notifier,
    caller: Uuid,
    request: VerifyPayment,
) -> Result<Verification, PaymentError> {
    let payment = store
        .find_payment(request.payment_id)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("payment {}", request.payment_id)))?;

    if payment.user_id != caller {
        tracing::warn!(payment_id = %payment.id, %caller, "verify attempted by non-owner");
        return Err(PaymentError::Forbidden(
            "not authorized to verify this payment".into(),
        ));
    }

    // No stored reference means the gateway never opened a checkout for
    // this payment, so there is nothing to verify.
    match &payment.tx_ref {
        Some(stored) if *stored == request.tx_ref => {}
        Some(_) => {
            return Err(PaymentError::Validation(
                "tx_ref does not match this payment".into(),
            ));
        }
        None => {
            tracing::warn!(payment_id = %payment.id, tx_ref = %request.tx_ref, "verify for payment without a checkout reference");
            return Err(PaymentError::Validation(
                "payment has no checkout reference to verify".into(),
            ));
        }
    }

    // tx_ref is unique, but guard against a row that shares it.
    if store
        .find_payment_by_tx_ref(&request.tx_ref)
        .await?
        .is_some_and(|owner| owner.id != payment.id)
    {
        return Err(PaymentError::Validation(
            "tx_ref belongs to a different payment".into(),
        ));
    }

    let verified = gateway.verify(&request.tx_ref).await?;
    let status = PaymentStatus::from(verified.status);

    let reconciled = apply_status(store, notifier, payment, status, Trigger::Poll { caller }).await?;

    Ok(Verification {
        reconciled,
        gateway_data: verified.data,
    })
}

/// Webhook path. The signature has already been checked by the adapter.
pub async fn handle_webhook(
    store: &dyn MarketStore,
    notifier: &dyn Notifier,
    notice: WebhookNotice,
) -> Result<Reconciled, PaymentError> {
    let payment = store
        .find_payment_by_tx_ref(&notice.tx_ref)
        .await?
        .ok_or_else(|| PaymentError::NotFound(format!("payment with tx_ref {}", notice.tx_ref)))?;

    let status = PaymentStatus::from(notice.status);
    apply_status(store, notifier, payment, status, Trigger::Webhook).await
}

/// Shared transition function for both triggers.
///
/// The status write is unconditional and not serialized against concurrent
/// calls for the same payment. Booking confirmation is guarded by the
/// booking still being PENDING. Every call that lands on COMPLETED emits its
/// notifications, so a poll racing a webhook can notify twice.
pub async fn apply_status(
    store: &dyn MarketStore,
    notifier: &dyn Notifier,
    payment: Payment,
    status: PaymentStatus,
    trigger: Trigger,
) -> Result<Reconciled, PaymentError> {
    let previous = payment.status;
    let updated = store.write_status(payment.id, status).await?;

    let overturned = status.overturns(&previous);
    if overturned {
        tracing::warn!(
            payment_id = %updated.id,
            from = %previous,
            to = %status,
            trigger = ?trigger,
            "payment status overturned"
        );
    } else {
        tracing::info!(
            payment_id = %updated.id,
            from = %previous,
            to = %status,
            trigger = ?trigger,
            "payment status written"
        );
    }

    let mut audit = updated.audit_entry(&trigger.actor(), "status_written");
    audit.detail = serde_json::json!({
        "old_status": previous.as_str(),
        "new_status": status.as_str(),
        "overturned": overturned,
    });
    if let Err(e) = store.insert_audit_entry(&audit).await {
        tracing::error!(payment_id = %updated.id, error = %e, "failed to audit status write");
    }

    let mut booking_confirmed = false;
    let booking = match updated.booking_id {
        Some(booking_id) => {
            if status == PaymentStatus::Completed {
                booking_confirmed = store.confirm_booking_if_pending(booking_id).await?;
                if booking_confirmed {
                    tracing::info!(%booking_id, payment_id = %updated.id, "booking confirmed");
                }
            }
            store.find_booking(booking_id).await?
        }
        None => None,
    };

    let notifications_sent = if status == PaymentStatus::Completed {
        notify_vendor(store, notifier, &updated).await
    } else {
        0
    };

    Ok(Reconciled {
        payment: updated,
        booking,
        booking_confirmed,
        notifications_sent,
    })
}

/// Best effort: every failure is logged and swallowed. Returns how many
/// notifications were handed to the notifier.
async fn notify_vendor(store: &dyn MarketStore, notifier: &dyn Notifier, payment: &Payment) -> usize {
    let details = match payment.booking_id {
        Some(booking_id) => match store.find_booking_details(booking_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::error!(payment_id = %payment.id, error = %e, "failed to load booking for notifications");
                None
            }
        },
        None => None,
    };

    let vendor = match &details {
        Some(details) => Some(details.vendor.clone()),
        None => match store.find_vendor_by_user(payment.recipient_id).await {
            Ok(vendor) => vendor,
            Err(e) => {
                tracing::error!(payment_id = %payment.id, error = %e, "failed to load vendor for notifications");
                None
            }
        },
    };

    let Some(vendor) = vendor else {
        tracing::warn!(payment_id = %payment.id, "no vendor profile for recipient, skipping notifications");
        return 0;
    };

    let mut notifications = vec![Notification::PaymentCompleted {
        vendor_email: vendor.email.clone(),
        vendor_name: vendor.business_name.clone(),
        payment_id: payment.id,
        amount: payment.amount.to_string(),
        vendor_amount: payment.vendor_amount.to_string(),
        currency: payment.currency.as_str().to_string(),
        tx_ref: payment.tx_ref.as_ref().map(|t| t.as_str().to_string()),
        service_title: details.as_ref().map(|d| d.service.title.clone()),
        event_date: details.as_ref().map(|d| d.booking.event_date),
    }];

    if let Some(details) = &details {
        notifications.push(Notification::NewBooking {
            vendor_email: vendor.email.clone(),
            vendor_name: vendor.business_name.clone(),
            booking_id: details.booking.id,
            service_title: details.service.title.clone(),
            client_name: details.client.full_name(),
            event_date: details.booking.event_date,
            location: details.booking.location.clone(),
        });
    }

    let mut sent = 0;
    for notification in notifications {
        let kind = notification.kind();
        match notifier.notify(notification).await {
            Ok(()) => sent += 1,
            Err(e) => {
                tracing::error!(payment_id = %payment.id, kind, error = %e, "notification failed");
            }
        }
    }
    sent
}
