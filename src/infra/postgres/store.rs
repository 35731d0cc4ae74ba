use {
    super::{audit_repo, booking_repo, payment_repo, profile_repo},
    crate::domain::{
        audit::NewAuditEntry,
        booking::Booking,
        error::PaymentError,
        id::TxRef,
        party::{BookingDetails, ClientProfile, VendorProfile},
        payment::{NewPayment, Payment, PaymentFilter, PaymentStatus},
        store::MarketStore,
    },
    async_trait::async_trait,
    sqlx::PgPool,
    uuid::Uuid,
};

/// PostgreSQL-backed `MarketStore`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MarketStore for PgStore {
    async fn find_client_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ClientProfile>, PaymentError> {
        profile_repo::find_client_by_user(&self.pool, user_id).await
    }

    async fn find_vendor_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<VendorProfile>, PaymentError> {
        profile_repo::find_vendor_by_user(&self.pool, user_id).await
    }

    async fn find_booking_details(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<BookingDetails>, PaymentError> {
        booking_repo::find_details(&self.pool, booking_id).await
    }

    async fn find_admin_subaccount(&self) -> Result<Option<String>, PaymentError> {
        profile_repo::find_admin_subaccount(&self.pool).await
    }

    async fn insert_payment(&self, payment: &NewPayment) -> Result<Payment, PaymentError> {
        payment_repo::insert_payment(&self.pool, payment).await
    }

    async fn set_tx_ref(&self, payment_id: Uuid, tx_ref: &TxRef) -> Result<(), PaymentError> {
        payment_repo::set_tx_ref(&self.pool, payment_id, tx_ref).await
    }

    async fn find_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, PaymentError> {
        payment_repo::find_by_id(&self.pool, payment_id).await
    }

    async fn find_payment_by_tx_ref(
        &self,
        tx_ref: &TxRef,
    ) -> Result<Option<Payment>, PaymentError> {
        payment_repo::find_by_tx_ref(&self.pool, tx_ref).await
    }

    async fn write_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> Result<Payment, PaymentError> {
        payment_repo::write_status(&self.pool, payment_id, status).await
    }

    async fn list_payments(
        &self,
        filter: &PaymentFilter,
    ) -> Result<(Vec<Payment>, i64), PaymentError> {
        payment_repo::list(&self.pool, filter).await
    }

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, PaymentError> {
        booking_repo::find_by_id(&self.pool, booking_id).await
    }

    async fn confirm_booking_if_pending(&self, booking_id: Uuid) -> Result<bool, PaymentError> {
        booking_repo::confirm_if_pending(&self.pool, booking_id).await
    }

    async fn insert_audit_entry(&self, entry: &NewAuditEntry) -> Result<(), PaymentError> {
        audit_repo::insert_audit_entry(&self.pool, entry).await
    }
}
