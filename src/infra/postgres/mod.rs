pub mod audit_repo;
pub mod booking_repo;
pub mod notification_repo;
pub mod payment_repo;
pub mod profile_repo;
pub mod store;

pub use {notification_repo::OutboxNotifier, store::PgStore};
