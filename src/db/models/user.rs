//! Staff account model and store operations.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

use super::common::StaffRole;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub address: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Parsed role; unknown strings degrade to the lowest privilege.
    pub fn staff_role(&self) -> StaffRole {
        StaffRole::from_str(&self.role).unwrap_or_default()
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_all(pool: &SqlitePool) -> sqlx::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    /// Persist a new account. The password must already be hashed.
    pub async fn insert(&self, pool: &SqlitePool) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, address, role) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.id)
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.password_hash)
        .bind(&self.address)
        .bind(&self.role)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Save mutable profile fields. `password_hash` is written as-is -
    /// the caller re-hashes only when the password actually changed.
    pub async fn save(&self, pool: &SqlitePool) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE users SET name = ?, address = ?, password_hash = ?, role = ?,
             updated_at = datetime('now') WHERE id = ?",
        )
        .bind(&self.name)
        .bind(&self.address)
        .bind(&self.password_hash)
        .bind(&self.role)
        .bind(&self.id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

/// Response DTO for User that excludes the password hash and timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub address: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            address: user.address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}
