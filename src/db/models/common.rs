//! Role types shared across models and the authorization gate.

use serde::{Deserialize, Serialize};

/// Staff roles, ordered by privilege. One canonical encoding - checks
/// compare against this enum, never against raw strings or numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StaffRole {
    SuperAdmin,
    Admin,
    WarehouseManager,
    DeliveryMan,
    CheckpointManager,
    User,
}

impl StaffRole {
    /// Privilege level for ordering checks; higher outranks lower.
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::SuperAdmin => 5,
            Self::Admin => 4,
            Self::WarehouseManager => 3,
            Self::CheckpointManager => 2,
            Self::DeliveryMan => 1,
            Self::User => 0,
        }
    }

    /// Admin-gated routes accept super-admin and admin only.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl Default for StaffRole {
    fn default() -> Self {
        Self::User
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SuperAdmin => "super-admin",
            Self::Admin => "admin",
            Self::WarehouseManager => "warehouse-manager",
            Self::DeliveryMan => "delivery-man",
            Self::CheckpointManager => "checkpoint-manager",
            Self::User => "user",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super-admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "warehouse-manager" => Ok(Self::WarehouseManager),
            "delivery-man" => Ok(Self::DeliveryMan),
            "checkpoint-manager" => Ok(Self::CheckpointManager),
            "user" => Ok(Self::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Client roles. Suppliers never log in; customers use OTP login.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientRole {
    Customer,
    Supplier,
}

impl std::fmt::Display for ClientRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Supplier => write!(f, "supplier"),
        }
    }
}

impl std::str::FromStr for ClientRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "supplier" => Ok(Self::Supplier),
            _ => Err(format!("Role must be either customer or supplier, got: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_staff_role_roundtrip() {
        for role in [
            StaffRole::SuperAdmin,
            StaffRole::Admin,
            StaffRole::WarehouseManager,
            StaffRole::DeliveryMan,
            StaffRole::CheckpointManager,
            StaffRole::User,
        ] {
            assert_eq!(StaffRole::from_str(&role.to_string()).unwrap(), role);
        }
        assert!(StaffRole::from_str("root").is_err());
    }

    #[test]
    fn test_admin_check() {
        assert!(StaffRole::SuperAdmin.is_admin());
        assert!(StaffRole::Admin.is_admin());
        assert!(!StaffRole::WarehouseManager.is_admin());
        assert!(!StaffRole::User.is_admin());
    }

    #[test]
    fn test_privilege_ordering() {
        assert!(StaffRole::SuperAdmin.privilege_level() > StaffRole::Admin.privilege_level());
        assert!(StaffRole::Admin.privilege_level() > StaffRole::WarehouseManager.privilege_level());
        assert_eq!(StaffRole::User.privilege_level(), 0);
    }

    #[test]
    fn test_client_role_parsing() {
        assert_eq!(ClientRole::from_str("customer").unwrap(), ClientRole::Customer);
        assert_eq!(ClientRole::from_str("supplier").unwrap(), ClientRole::Supplier);
        assert!(ClientRole::from_str("vendor").is_err());
    }
}
