use {
    super::audit::NewAuditEntry,
    super::booking::Booking,
    super::error::PaymentError,
    super::id::TxRef,
    super::party::{BookingDetails, ClientProfile, VendorProfile},
    super::payment::{NewPayment, Payment, PaymentFilter, PaymentStatus},
    async_trait::async_trait,
    uuid::Uuid,
};

/// Data access for the payment flow. Each method is a single persistence
/// step; nothing here spans a transaction across calls.
#[async_trait]
pub trait MarketStore: Send + Sync {
    async fn find_client_by_user(&self, user_id: Uuid)
    -> Result<Option<ClientProfile>, PaymentError>;

    async fn find_vendor_by_user(&self, user_id: Uuid)
    -> Result<Option<VendorProfile>, PaymentError>;

    async fn find_booking_details(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<BookingDetails>, PaymentError>;

    /// Payout subaccount of the platform admin, if one is registered.
    async fn find_admin_subaccount(&self) -> Result<Option<String>, PaymentError>;

    async fn insert_payment(&self, payment: &NewPayment) -> Result<Payment, PaymentError>;

    async fn set_tx_ref(&self, payment_id: Uuid, tx_ref: &TxRef) -> Result<(), PaymentError>;

    async fn find_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, PaymentError>;

    async fn find_payment_by_tx_ref(&self, tx_ref: &TxRef)
    -> Result<Option<Payment>, PaymentError>;

    /// Unconditional overwrite of status and `updated_at`.
    async fn write_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> Result<Payment, PaymentError>;

    async fn list_payments(
        &self,
        filter: &PaymentFilter,
    ) -> Result<(Vec<Payment>, i64), PaymentError>;

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, PaymentError>;

    /// PENDING -> CONFIRMED. Returns `false` when the booking was not PENDING.
    async fn confirm_booking_if_pending(&self, booking_id: Uuid) -> Result<bool, PaymentError>;

    async fn insert_audit_entry(&self, entry: &NewAuditEntry) -> Result<(), PaymentError>;
}
