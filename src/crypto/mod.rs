//! Credential primitives: password hashing and session tokens.
//!
//! Session tokens are stateless HS256 JWTs carrying only the principal id
//! and an expiry. There is no server-side revocation; a token is valid
//! exactly as long as its signature checks out and it has not expired.
//! Every verification failure is reported with the same generic error so
//! callers cannot distinguish expired from malformed or mis-signed tokens.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The uniform authentication failure. Deliberately carries no detail.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Authentication invalid")]
pub struct AuthInvalid;

/// Claims embedded in a session token. Only the principal id travels in
/// the token; everything else is re-loaded from the store per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Issue a session token for a principal.
pub fn issue_token(
    principal_id: &str,
    secret: &str,
    lifetime_hours: i64,
) -> Result<String, AuthInvalid> {
    let now = Utc::now();
    let claims = Claims {
        sub: principal_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(lifetime_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthInvalid)
}

/// Verify a session token and return the principal id it carries.
pub fn verify_token(token: &str, secret: &str) -> Result<String, AuthInvalid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthInvalid)?;

    Ok(data.claims.sub)
}
