use {
    super::error::PaymentError,
    super::id::TxRef,
    super::money::{Currency, MoneyAmount},
    super::payment::PaymentStatus,
    async_trait::async_trait,
    serde::{Deserialize, Deserializer},
};

/// Transaction status vocabulary of the hosted checkout gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    Success,
    /// `failed` or `fail`.
    Failed,
    Pending,
    Unrecognized(String),
}

impl From<&str> for GatewayStatus {
    fn from(s: &str) -> Self {
        match s {
            "success" => Self::Success,
            "failed" | "fail" => Self::Failed,
            "pending" => Self::Pending,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for GatewayStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// Anything the gateway says that we don't recognize is treated as a failure.
impl From<GatewayStatus> for PaymentStatus {
    fn from(status: GatewayStatus) -> Self {
        match status {
            GatewayStatus::Success => PaymentStatus::Completed,
            GatewayStatus::Failed => PaymentStatus::Failed,
            GatewayStatus::Pending => PaymentStatus::Pending,
            GatewayStatus::Unrecognized(raw) => {
                tracing::warn!(gateway_status = %raw, "unrecognized gateway status, treating as FAILED");
                PaymentStatus::Failed
            }
        }
    }
}

/// One payout destination in a percentage split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInstruction {
    pub subaccount_id: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub amount: MoneyAmount,
    pub currency: Currency,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub tx_ref: TxRef,
    pub callback_url: String,
    pub return_url: String,
    pub title: String,
    pub description: String,
    pub splits: Vec<SplitInstruction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub checkout_url: String,
}

/// Result of asking the gateway about a transaction.
#[derive(Debug, Clone)]
pub struct VerifiedTransaction {
    pub status: GatewayStatus,
    /// Gateway payload, passed through to poll callers.
    pub data: serde_json::Value,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initialize(&self, request: &CheckoutRequest) -> Result<CheckoutSession, PaymentError>;

    async fn verify(&self, tx_ref: &TxRef) -> Result<VerifiedTransaction, PaymentError>;
}
