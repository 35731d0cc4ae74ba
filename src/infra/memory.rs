use {
    crate::domain::{
        audit::NewAuditEntry,
        booking::{Booking, BookingStatus},
        error::PaymentError,
        id::TxRef,
        party::{BookingDetails, ClientProfile, Service, VendorProfile},
        payment::{NewPayment, Payment, PaymentFilter, PaymentStatus},
        store::MarketStore,
    },
    async_trait::async_trait,
    chrono::Utc,
    std::{collections::HashMap, sync::Arc},
    tokio::sync::RwLock,
    uuid::Uuid,
};

#[derive(Default)]
struct Tables {
    clients: HashMap<Uuid, ClientProfile>,
    vendors: HashMap<Uuid, VendorProfile>,
    services: HashMap<Uuid, Service>,
    bookings: HashMap<Uuid, Booking>,
    payments: HashMap<Uuid, Payment>,
    admin_subaccount: Option<String>,
    audit: Vec<AuditRecord>,
}

/// Audit entry as kept by the in-memory store.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub entity_id: Uuid,
    pub action: String,
    pub actor: String,
    pub detail: serde_json::Value,
}

/// Thread-safe in-memory `MarketStore`. Backs tests and local runs without
/// a database. Cloning shares the same tables.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_client(&self, client: ClientProfile) {
        self.tables.write().await.clients.insert(client.id, client);
    }

    pub async fn add_vendor(&self, vendor: VendorProfile) {
        self.tables.write().await.vendors.insert(vendor.id, vendor);
    }

    pub async fn add_service(&self, service: Service) {
        self.tables.write().await.services.insert(service.id, service);
    }

    pub async fn add_booking(&self, booking: Booking) {
        self.tables.write().await.bookings.insert(booking.id, booking);
    }

    pub async fn add_payment(&self, payment: Payment) {
        self.tables.write().await.payments.insert(payment.id, payment);
    }

    pub async fn set_admin_subaccount(&self, subaccount: Option<String>) {
        self.tables.write().await.admin_subaccount = subaccount;
    }

    pub async fn payment_count(&self) -> usize {
        self.tables.read().await.payments.len()
    }

    pub async fn audit_entries(&self, entity_id: Uuid) -> Vec<AuditRecord> {
        self.tables
            .read()
            .await
            .audit
            .iter()
            .filter(|a| a.entity_id == entity_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MarketStore for InMemoryStore {
    async fn find_client_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ClientProfile>, PaymentError> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn find_vendor_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<VendorProfile>, PaymentError> {
        let tables = self.tables.read().await;
        Ok(tables
            .vendors
            .values()
            .find(|v| v.user_id == user_id)
            .cloned())
    }

    async fn find_booking_details(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<BookingDetails>, PaymentError> {
        let tables = self.tables.read().await;
        let details = tables.bookings.get(&booking_id).and_then(|booking| {
            let service = tables.services.get(&booking.service_id)?;
            let vendor = tables.vendors.get(&service.vendor_id)?;
            let client = tables.clients.get(&booking.client_id)?;
            Some(BookingDetails {
                booking: booking.clone(),
                service: service.clone(),
                vendor: vendor.clone(),
                client: client.clone(),
            })
        });
        Ok(details)
    }

    async fn find_admin_subaccount(&self) -> Result<Option<String>, PaymentError> {
        Ok(self.tables.read().await.admin_subaccount.clone())
    }

    async fn insert_payment(&self, payment: &NewPayment) -> Result<Payment, PaymentError> {
        let row = payment.clone().into_payment(Utc::now());
        self.tables.write().await.payments.insert(row.id, row.clone());
        Ok(row)
    }

    async fn set_tx_ref(&self, payment_id: Uuid, tx_ref: &TxRef) -> Result<(), PaymentError> {
        let mut tables = self.tables.write().await;
        let payment = tables
            .payments
            .get_mut(&payment_id)
            .ok_or_else(|| PaymentError::NotFound(format!("payment {payment_id}")))?;
        payment.tx_ref = Some(tx_ref.clone());
        payment.updated_at = Utc::now();
        Ok(())
    }

    async fn find_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, PaymentError> {
        Ok(self.tables.read().await.payments.get(&payment_id).cloned())
    }

    async fn find_payment_by_tx_ref(
        &self,
        tx_ref: &TxRef,
    ) -> Result<Option<Payment>, PaymentError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .values()
            .find(|p| p.tx_ref.as_ref() == Some(tx_ref))
            .cloned())
    }

    async fn write_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> Result<Payment, PaymentError> {
        let mut tables = self.tables.write().await;
        let payment = tables
            .payments
            .get_mut(&payment_id)
            .ok_or_else(|| PaymentError::NotFound(format!("payment {payment_id}")))?;
        payment.status = status;
        payment.updated_at = Utc::now();
        Ok(payment.clone())
    }

    async fn list_payments(
        &self,
        filter: &PaymentFilter,
    ) -> Result<(Vec<Payment>, i64), PaymentError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Payment> = tables
            .payments
            .values()
            .filter(|p| p.is_visible_to(filter.user_id))
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(filter.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, PaymentError> {
        Ok(self.tables.read().await.bookings.get(&booking_id).cloned())
    }

    async fn confirm_booking_if_pending(&self, booking_id: Uuid) -> Result<bool, PaymentError> {
        let mut tables = self.tables.write().await;
        match tables.bookings.get_mut(&booking_id) {
            Some(booking) if booking.status == BookingStatus::Pending => {
                booking.status = BookingStatus::Confirmed;
                booking.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_audit_entry(&self, entry: &NewAuditEntry) -> Result<(), PaymentError> {
        self.tables.write().await.audit.push(AuditRecord {
            entity_id: entry.entity_id,
            action: entry.action.clone(),
            actor: entry.actor.clone(),
            detail: entry.detail.clone(),
        });
        Ok(())
    }
}
