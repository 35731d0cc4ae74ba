pub mod audit;
pub mod booking;
pub mod error;
pub mod gateway;
pub mod id;
pub mod money;
pub mod notification;
pub mod party;
pub mod payment;
pub mod store;
