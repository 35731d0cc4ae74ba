use {
    super::audit::NewAuditEntry,
    super::error::PaymentError,
    super::id::TxRef,
    super::money::{Currency, MoneyAmount, Split},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Lifecycle rank, higher is further along.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Completed | Self::Failed => 1,
            Self::Refunded => 2,
        }
    }

    /// True when writing `self` replaces a status that had already left
    /// PENDING. Writes are not gated on this; it is only logged and audited.
    pub fn overturns(&self, previous: &PaymentStatus) -> bool {
        previous.rank() > 0 && self != previous
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "REFUNDED" => Ok(Self::Refunded),
            other => Err(PaymentError::Validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Chapa,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chapa => "CHAPA",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "CHAPA" => Ok(Self::Chapa),
            other => Err(PaymentError::Validation(format!(
                "unknown payment method: {other}"
            ))),
        }
    }
}

/// Payment record as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub amount: MoneyAmount,
    pub currency: Currency,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub tx_ref: Option<TxRef>,
    pub user_id: Uuid,
    pub recipient_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub admin_amount: MoneyAmount,
    pub vendor_amount: MoneyAmount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Either side of the payment may read it.
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.user_id == user_id || self.recipient_id == user_id
    }

    pub fn audit_entry(&self, actor: &str, action: &str) -> NewAuditEntry {
        NewAuditEntry {
            id: Uuid::now_v7(),
            entity_type: "payment".to_string(),
            entity_id: self.id,
            action: action.to_string(),
            actor: actor.to_string(),
            detail: serde_json::json!({
                "amount": self.amount.to_string(),
                "currency": self.currency.as_str(),
                "status": self.status.as_str(),
                "tx_ref": self.tx_ref.as_ref().map(TxRef::as_str),
            }),
        }
    }
}

/// For INSERT. Always PENDING, id generated in Rust via `Uuid::now_v7()`.
#[derive(Debug, Clone)]
pub struct NewPayment {
    id: Uuid,
    amount: MoneyAmount,
    currency: Currency,
    user_id: Uuid,
    recipient_id: Uuid,
    booking_id: Option<Uuid>,
    split: Split,
}

pub struct NewPaymentParams {
    pub amount: MoneyAmount,
    pub currency: Currency,
    pub user_id: Uuid,
    pub recipient_id: Uuid,
    pub booking_id: Option<Uuid>,
}

impl NewPayment {
    pub fn new(params: NewPaymentParams) -> Self {
        Self {
            id: Uuid::now_v7(),
            split: Split::of(params.amount),
            amount: params.amount,
            currency: params.currency,
            user_id: params.user_id,
            recipient_id: params.recipient_id,
            booking_id: params.booking_id,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> MoneyAmount {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::Pending
    }

    pub fn method(&self) -> PaymentMethod {
        PaymentMethod::Chapa
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn recipient_id(&self) -> Uuid {
        self.recipient_id
    }

    pub fn booking_id(&self) -> Option<Uuid> {
        self.booking_id
    }

    pub fn split(&self) -> Split {
        self.split
    }

    /// The row as it reads back right after insert.
    pub fn into_payment(self, now: DateTime<Utc>) -> Payment {
        Payment {
            id: self.id,
            amount: self.amount,
            currency: self.currency,
            status: PaymentStatus::Pending,
            method: PaymentMethod::Chapa,
            tx_ref: None,
            user_id: self.user_id,
            recipient_id: self.recipient_id,
            booking_id: self.booking_id,
            admin_amount: self.split.admin,
            vendor_amount: self.split.vendor,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Filter for the payments listing.
#[derive(Debug, Clone)]
pub struct PaymentFilter {
    pub user_id: Uuid,
    pub status: Option<PaymentStatus>,
    pub page: u32,
    pub limit: u32,
}

impl PaymentFilter {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}
