pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

use {
    domain::{gateway::PaymentGateway, notification::Notifier, store::MarketStore},
    services::checkout::CheckoutSettings,
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
    pub checkout: Arc<CheckoutSettings>,
    pub chapa_webhook_secret: Arc<str>,
}
