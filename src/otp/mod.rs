//! One-time-code login for customers.
//!
//! A client holds at most one active code. Generation overwrites any
//! prior code; verification consumes the code with a guarded UPDATE so a
//! code that has been accepted once can never be accepted again, even
//! under concurrent verification attempts.
//!
//! Codes are 4 uniform digits from the process RNG. That is a deliberate
//! low-security default - possession of the phone number's inbox is the
//! actual factor, and delivery goes through the injected notifier.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::{Client, ClientRole};

/// How long a generated code stays valid.
pub const OTP_LIFETIME_MINUTES: i64 = 4;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Client not found")]
    NotFound,
    #[error("Supplier can not login")]
    SupplierLogin,
    #[error("Invalid OTP")]
    Invalid,
    #[error("OTP expired")]
    Expired,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Generate and store a fresh code for the client behind `phone`.
///
/// Returns the code and its absolute expiry. Any previously stored code
/// is overwritten.
pub async fn generate(pool: &SqlitePool, phone: &str) -> Result<(String, DateTime<Utc>), OtpError> {
    let client = Client::find_by_phone(pool, phone)
        .await?
        .ok_or(OtpError::NotFound)?;

    if client.client_role() == ClientRole::Supplier {
        warn!(phone = %phone, "OTP requested for supplier account");
        return Err(OtpError::SupplierLogin);
    }

    let code = rand::rng().random_range(1000..=9999).to_string();
    let expiry = Utc::now() + Duration::minutes(OTP_LIFETIME_MINUTES);

    sqlx::query("UPDATE clients SET otp = ?, otp_expiry = ?, updated_at = datetime('now') WHERE id = ?")
        .bind(&code)
        .bind(expiry.to_rfc3339())
        .bind(&client.id)
        .execute(pool)
        .await?;

    info!(client_id = %client.id, "OTP generated");
    Ok((code, expiry))
}

/// Verify `code` for the customer behind `phone` and consume it.
///
/// The consuming UPDATE is guarded on the stored code still matching; if
/// another request consumed it first, zero rows change and this attempt
/// fails as invalid.
pub async fn verify(pool: &SqlitePool, phone: &str, code: &str) -> Result<Client, OtpError> {
    let customer = Client::find_customer_by_phone(pool, phone)
        .await?
        .ok_or(OtpError::NotFound)?;

    let stored = customer.otp.as_deref().ok_or(OtpError::Invalid)?;
    if !codes_match(stored, code) {
        return Err(OtpError::Invalid);
    }

    let expiry = customer
        .otp_expiry
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .ok_or(OtpError::Invalid)?;
    if Utc::now() >= expiry {
        return Err(OtpError::Expired);
    }

    let consumed = sqlx::query(
        "UPDATE clients SET otp = NULL, otp_expiry = NULL, updated_at = datetime('now')
         WHERE id = ? AND otp = ?",
    )
    .bind(&customer.id)
    .bind(code)
    .execute(pool)
    .await?;

    if consumed.rows_affected() == 0 {
        // A concurrent verification won the race and already consumed it
        return Err(OtpError::Invalid);
    }

    info!(client_id = %customer.id, "OTP verified");
    Ok(customer)
}

/// Exact string match in constant time. No normalization.
fn codes_match(stored: &str, supplied: &str) -> bool {
    stored.len() == supplied.len() && stored.as_bytes().ct_eq(supplied.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ids, ids::EntityKind};
    use uuid::Uuid;

    async fn seed_client(pool: &SqlitePool, phone: &str, role: ClientRole) -> Client {
        let user_id = ids::mint(pool, EntityKind::Client(role)).await.unwrap();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            user_id,
            name: "Test Client".to_string(),
            email: format!("{}@example.com", phone),
            phone: phone.to_string(),
            address: String::new(),
            role: role.to_string(),
            otp: None,
            otp_expiry: None,
            forms: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        client.insert(pool).await.unwrap();
        client
    }

    #[test]
    fn test_codes_match_exact() {
        assert!(codes_match("1234", "1234"));
        assert!(!codes_match("1234", "4321"));
        assert!(!codes_match("1234", "01234"));
        assert!(!codes_match("1234", ""));
    }

    #[tokio::test]
    async fn test_generate_stores_code_and_expiry() {
        let pool = crate::db::init_memory().await.unwrap();
        seed_client(&pool, "5550100", ClientRole::Customer).await;

        let before = Utc::now();
        let (code, expiry) = generate(&pool, "5550100").await.unwrap();
        let after = Utc::now();

        let n: u32 = code.parse().unwrap();
        assert!((1000..=9999).contains(&n));

        // Expiry is exactly generation time + 4 minutes, and generation
        // happened between the two probes
        assert!(expiry - before >= Duration::minutes(OTP_LIFETIME_MINUTES));
        assert!(expiry - after <= Duration::minutes(OTP_LIFETIME_MINUTES));

        let stored = Client::find_by_phone(&pool, "5550100")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.otp.as_deref(), Some(code.as_str()));
        assert!(stored.otp_expiry.is_some());
    }

    #[tokio::test]
    async fn test_generate_overwrites_prior_code() {
        let pool = crate::db::init_memory().await.unwrap();
        seed_client(&pool, "5550101", ClientRole::Customer).await;

        let (first, _) = generate(&pool, "5550101").await.unwrap();
        let (second, _) = generate(&pool, "5550101").await.unwrap();

        let stored = Client::find_by_phone(&pool, "5550101")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.otp.as_deref(), Some(second.as_str()));

        // The superseded code no longer verifies unless it happens to
        // collide with the new one
        if first != second {
            assert!(matches!(
                verify(&pool, "5550101", &first).await,
                Err(OtpError::Invalid)
            ));
        }
    }

    #[tokio::test]
    async fn test_generate_unknown_phone() {
        let pool = crate::db::init_memory().await.unwrap();
        assert!(matches!(
            generate(&pool, "0000000").await,
            Err(OtpError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_generate_rejects_supplier() {
        let pool = crate::db::init_memory().await.unwrap();
        seed_client(&pool, "5550102", ClientRole::Supplier).await;

        assert!(matches!(
            generate(&pool, "5550102").await,
            Err(OtpError::SupplierLogin)
        ));
    }

    #[tokio::test]
    async fn test_verify_consumes_code() {
        let pool = crate::db::init_memory().await.unwrap();
        seed_client(&pool, "5550103", ClientRole::Customer).await;

        let (code, _) = generate(&pool, "5550103").await.unwrap();
        let client = verify(&pool, "5550103", &code).await.unwrap();
        assert_eq!(client.phone, "5550103");

        // Code and expiry are cleared
        let stored = Client::find_by_phone(&pool, "5550103")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.otp.is_none());
        assert!(stored.otp_expiry.is_none());

        // Replay fails
        assert!(matches!(
            verify(&pool, "5550103", &code).await,
            Err(OtpError::Invalid)
        ));
    }

    #[tokio::test]
    async fn test_verify_wrong_code() {
        let pool = crate::db::init_memory().await.unwrap();
        seed_client(&pool, "5550104", ClientRole::Customer).await;

        let (code, _) = generate(&pool, "5550104").await.unwrap();
        let wrong = if code == "1000" { "1001" } else { "1000" };
        assert!(matches!(
            verify(&pool, "5550104", wrong).await,
            Err(OtpError::Invalid)
        ));

        // The stored code survives a failed attempt
        let stored = Client::find_by_phone(&pool, "5550104")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.otp.as_deref(), Some(code.as_str()));
    }

    #[tokio::test]
    async fn test_verify_expired_code() {
        let pool = crate::db::init_memory().await.unwrap();
        let client = seed_client(&pool, "5550105", ClientRole::Customer).await;

        let (code, _) = generate(&pool, "5550105").await.unwrap();

        // Backdate the expiry to one second in the past
        let past = (Utc::now() - Duration::seconds(1)).to_rfc3339();
        sqlx::query("UPDATE clients SET otp_expiry = ? WHERE id = ?")
            .bind(&past)
            .bind(&client.id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            verify(&pool, "5550105", &code).await,
            Err(OtpError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_verify_never_matches_supplier() {
        let pool = crate::db::init_memory().await.unwrap();
        seed_client(&pool, "5550106", ClientRole::Supplier).await;

        // Even with a code planted directly, the customer-scoped lookup
        // misses supplier rows
        sqlx::query("UPDATE clients SET otp = '1234', otp_expiry = ? WHERE phone = '5550106'")
            .bind((Utc::now() + Duration::minutes(4)).to_rfc3339())
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            verify(&pool, "5550106", "1234").await,
            Err(OtpError::NotFound)
        ));
    }
}
