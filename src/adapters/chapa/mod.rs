pub mod client;
pub mod signature;
pub mod webhook;

pub use client::ChapaGateway;
