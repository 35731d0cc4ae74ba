//! Reference data the payment flow reads but never writes.

use {crate::domain::booking::Booking, uuid::Uuid};

/// A client profile joined with its user account.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl ClientProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A vendor profile joined with its user account.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub email: String,
    /// Payout subaccount registered with the gateway.
    pub subaccount_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
}

/// Booking with everything hanging off it that checkout and notifications need.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub service: Service,
    pub vendor: VendorProfile,
    pub client: ClientProfile,
}
