pub mod checkout;
pub mod notification_worker;
pub mod payment_queries;
pub mod reconciliation;
