//! Client model (customers and suppliers) and store operations.
//!
//! Clients carry the OTP challenge state inline: at most one code and its
//! expiry, both cleared on consumption. `forms` is a JSON array stored as
//! TEXT mapping bookings to externally hosted document links.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

use super::common::ClientRole;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expiry: Option<String>,
    pub forms: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A booking form attached to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingForm {
    pub booking_id: String,
    pub link: String,
}

/// Helper to parse the forms JSON column
pub fn parse_forms(json: Option<&str>) -> Vec<BookingForm> {
    json.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// Helper to serialize forms back to the column representation
pub fn serialize_forms(forms: &[BookingForm]) -> Option<String> {
    if forms.is_empty() {
        None
    } else {
        serde_json::to_string(forms).ok()
    }
}

impl Client {
    pub fn client_role(&self) -> ClientRole {
        ClientRole::from_str(&self.role).unwrap_or(ClientRole::Customer)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<Client>> {
        sqlx::query_as("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> sqlx::Result<Option<Client>> {
        sqlx::query_as("SELECT * FROM clients WHERE phone = ?")
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Customer lookup for OTP verification; suppliers are out of scope.
    pub async fn find_customer_by_phone(
        pool: &SqlitePool,
        phone: &str,
    ) -> sqlx::Result<Option<Client>> {
        sqlx::query_as("SELECT * FROM clients WHERE phone = ? AND role = 'customer'")
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Duplicate check used at registration: same email or phone within
    /// the same role.
    pub async fn find_duplicate(
        pool: &SqlitePool,
        email: &str,
        phone: &str,
        role: ClientRole,
    ) -> sqlx::Result<Option<Client>> {
        sqlx::query_as("SELECT * FROM clients WHERE (email = ? OR phone = ?) AND role = ?")
            .bind(email)
            .bind(phone)
            .bind(role.to_string())
            .fetch_optional(pool)
            .await
    }

    pub async fn insert(&self, pool: &SqlitePool) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO clients (id, user_id, name, email, phone, address, role, forms)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.id)
        .bind(&self.user_id)
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.phone)
        .bind(&self.address)
        .bind(&self.role)
        .bind(&self.forms)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Save mutable profile fields. OTP state is owned by the OTP engine
    /// and never written through this path.
    pub async fn save(&self, pool: &SqlitePool) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE clients SET name = ?, email = ?, phone = ?, address = ?, forms = ?,
             updated_at = datetime('now') WHERE id = ?",
        )
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.phone)
        .bind(&self.address)
        .bind(&self.forms)
        .bind(&self.id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Response DTO for Client; OTP state is never serialized outward.
#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    pub forms: Vec<BookingForm>,
    pub created_at: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            forms: parse_forms(client.forms.as_deref()),
            id: client.id,
            user_id: client.user_id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            address: client.address,
            role: client.role,
            created_at: client.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms_roundtrip() {
        let forms = vec![
            BookingForm {
                booking_id: "B1a2b3c4d0001".to_string(),
                link: "https://forms.example.com/abc".to_string(),
            },
            BookingForm {
                booking_id: "B9f8e7d6c0002".to_string(),
                link: "https://forms.example.com/def".to_string(),
            },
        ];

        let json = serialize_forms(&forms).unwrap();
        assert_eq!(parse_forms(Some(&json)), forms);
    }

    #[test]
    fn test_parse_forms_handles_empty_and_garbage() {
        assert!(parse_forms(None).is_empty());
        assert!(parse_forms(Some("not json")).is_empty());
        assert_eq!(serialize_forms(&[]), None);
    }
}
