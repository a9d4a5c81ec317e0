//! Shipping container model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Container {
    pub id: String,
    pub container_id: String,
    pub model: String,
    pub status: String,
    pub medium: String,
    pub location: Option<String>,
    /// JSON array of port names
    pub ports: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub const CONTAINER_STATUSES: [&str; 2] = ["Available", "Full"];

pub const TRANSPORT_MEDIUMS: [&str; 3] = ["Sea", "Air", "Land"];

/// Helper to parse the ports JSON column
pub fn parse_ports(json: Option<&str>) -> Vec<String> {
    json.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ports() {
        let json = r#"["Chattogram","Singapore","Rotterdam"]"#;
        assert_eq!(
            parse_ports(Some(json)),
            vec!["Chattogram", "Singapore", "Rotterdam"]
        );
        assert!(parse_ports(None).is_empty());
        assert!(parse_ports(Some("oops")).is_empty());
    }
}
