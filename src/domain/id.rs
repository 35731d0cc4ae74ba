use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PaymentError;

const TX_REF_PREFIX: &str = "wp-";
const TX_REF_MAX_LEN: usize = 64;

/// Gateway transaction reference. Generated by us at checkout time and
/// echoed back by the gateway on verification and webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxRef(String);

impl TxRef {
    pub fn new(tx_ref: impl Into<String>) -> Result<Self, PaymentError> {
        let tx_ref = tx_ref.into();
        if tx_ref.is_empty() {
            return Err(PaymentError::Validation("tx_ref is required".into()));
        }
        if tx_ref.len() > TX_REF_MAX_LEN {
            return Err(PaymentError::Validation(format!(
                "tx_ref longer than {TX_REF_MAX_LEN} characters"
            )));
        }
        if !tx_ref
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(PaymentError::Validation(format!(
                "tx_ref contains invalid characters: {tx_ref}"
            )));
        }
        Ok(Self(tx_ref))
    }

    /// Reference read back from storage. Validation only guards input, so
    /// older rows stay readable even if the rules tightened since.
    pub fn from_stored(tx_ref: String) -> Self {
        Self(tx_ref)
    }

    /// Fresh reference for a new checkout session. Never reused.
    pub fn generate() -> Self {
        Self(format!("{TX_REF_PREFIX}{}", Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for TxRef {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TxRef> for String {
    fn from(value: TxRef) -> Self {
        value.0
    }
}
