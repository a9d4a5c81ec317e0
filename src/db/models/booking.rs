//! Booking model. Sender and receiver contacts are JSON stored as TEXT.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: String,
    pub booking_id: String,
    /// JSON ContactInfo
    pub sender: String,
    /// JSON ContactInfo
    pub receiver: String,
    pub kind: String,
    pub status: String,
    pub supplier_status: String,
    pub supplier_id: Option<String>,
    pub container_id: Option<String>,
    pub payment_id: Option<String>,
    pub location: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Shipment status lifecycle. CWA/BWA mark arrival at the respective
/// warehouse authority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "accepted")]
    Accepted,
    #[serde(rename = "cancelled")]
    Cancelled,
    #[serde(rename = "delivered")]
    Delivered,
    #[serde(rename = "CWA")]
    Cwa,
    #[serde(rename = "BWA")]
    Bwa,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Processing => "processing",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Cancelled => "cancelled",
            Self::Delivered => "delivered",
            Self::Cwa => "CWA",
            Self::Bwa => "BWA",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "cancelled" => Ok(Self::Cancelled),
            "delivered" => Ok(Self::Delivered),
            "CWA" => Ok(Self::Cwa),
            "BWA" => Ok(Self::Bwa),
            _ => Err(format!("Unknown booking status: {}", s)),
        }
    }
}

/// Booking kinds
pub const BOOKING_KINDS: [&str; 2] = ["bundled", "single"];

/// Supplier assignment states
pub const SUPPLIER_STATUSES: [&str; 3] = ["clientself", "supplierself", "pending"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_roundtrip() {
        for s in [
            "processing",
            "pending",
            "accepted",
            "cancelled",
            "delivered",
            "CWA",
            "BWA",
        ] {
            assert_eq!(BookingStatus::from_str(s).unwrap().to_string(), s);
        }
        assert!(BookingStatus::from_str("lost").is_err());
        // Warehouse codes are uppercase on the wire
        assert!(BookingStatus::from_str("cwa").is_err());
    }
}
