use {
    super::error::PaymentError,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    std::{fmt, str::FromStr},
};

/// Platform commission on every booking payment, in percent.
pub const ADMIN_SHARE_PERCENT: u8 = 10;

/// Amount in minor units (santim / cents). Serialized as a decimal string
/// with two fraction digits, parsed from either a JSON number or string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MoneyAmount(i64);

impl MoneyAmount {
    pub const ZERO: MoneyAmount = MoneyAmount(0);

    pub fn new(minor: i64) -> Result<Self, PaymentError> {
        if minor < 0 {
            return Err(PaymentError::Validation(format!(
                "MoneyAmount cannot be negative, got: {minor}"
            )));
        }
        Ok(Self(minor))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: MoneyAmount) -> Option<MoneyAmount> {
        self.0.checked_add(other.0).map(MoneyAmount)
    }

    pub fn checked_sub(self, other: MoneyAmount) -> Option<MoneyAmount> {
        self.0
            .checked_sub(other.0)
            .filter(|&v| v >= 0)
            .map(MoneyAmount)
    }

    /// `percent`% of this amount, rounded down.
    pub fn percent(self, percent: u8) -> MoneyAmount {
        let share = i128::from(self.0) * i128::from(percent) / 100;
        // share <= self.0 for percent <= 100
        MoneyAmount(i64::try_from(share).unwrap_or(self.0))
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for MoneyAmount {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaymentError::Validation(format!("invalid amount: {s}"));
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        // JSON floats like `1000.0` render with a trailing zero digit.
        let frac = frac.trim_end_matches('0');
        if frac.len() > 2 {
            return Err(PaymentError::Validation(format!(
                "amount has more than two fraction digits: {s}"
            )));
        }
        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<2}").parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac))
            .map(MoneyAmount)
            .ok_or_else(|| PaymentError::Validation(format!("amount out of range: {s}")))
    }
}

impl Serialize for MoneyAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MoneyAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Etb,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Etb => "ETB",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Currency {
    type Error = PaymentError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_uppercase().as_str() {
            "ETB" => Ok(Self::Etb),
            "USD" => Ok(Self::Usd),
            _ => Err(PaymentError::Validation(format!("unknown currency: {s}"))),
        }
    }
}

/// Disbursement of one payment between the platform and the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub admin: MoneyAmount,
    pub vendor: MoneyAmount,
}

impl Split {
    /// Platform takes `ADMIN_SHARE_PERCENT` rounded down, the vendor the rest,
    /// so the two shares always sum to `amount`.
    pub fn of(amount: MoneyAmount) -> Self {
        let admin = amount.percent(ADMIN_SHARE_PERCENT);
        let vendor = amount.checked_sub(admin).unwrap_or(MoneyAmount::ZERO);
        Self { admin, vendor }
    }

    /// Fractions handed to the gateway's percentage split.
    pub fn admin_fraction() -> f64 {
        f64::from(ADMIN_SHARE_PERCENT) / 100.0
    }

    pub fn vendor_fraction() -> f64 {
        f64::from(100 - ADMIN_SHARE_PERCENT) / 100.0
    }
}
