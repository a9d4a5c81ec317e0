//! Minted identifiers: the human-readable IDs stamped on clients,
//! bookings, containers and warehouses at creation time.
//!
//! Format is `{prefix}{hex salt}{4-digit sequence}`, e.g. `B1f3a9c020017`
//! or `C0001` (clients carry no salt). The sequence comes from a per-kind
//! counter row incremented in a single upsert statement, so two concurrent
//! creations can never observe the same number. Minting happens once,
//! before the entity's first INSERT; an existing identifier is never
//! replaced.

use rand::RngCore;
use sqlx::SqlitePool;

use crate::db::ClientRole;

/// The entity kinds that carry a minted identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Client(ClientRole),
    Booking,
    Container,
    Warehouse,
}

impl EntityKind {
    /// Identifier prefix per kind. Client prefixes depend on role.
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Client(ClientRole::Customer) => "C",
            EntityKind::Client(ClientRole::Supplier) => "S",
            EntityKind::Booking => "B",
            EntityKind::Container => "CON",
            EntityKind::Warehouse => "W",
        }
    }

    /// Random salt width in bytes. Clients have none; customers and
    /// suppliers are told their id over the phone.
    fn salt_bytes(&self) -> usize {
        match self {
            EntityKind::Client(_) => 0,
            EntityKind::Booking | EntityKind::Container => 4,
            EntityKind::Warehouse => 3,
        }
    }

    /// Counter row key. Customers and suppliers share one sequence.
    fn counter_key(&self) -> &'static str {
        match self {
            EntityKind::Client(_) => "client",
            EntityKind::Booking => "booking",
            EntityKind::Container => "container",
            EntityKind::Warehouse => "warehouse",
        }
    }
}

/// Atomically advance the counter for `kind` and return the next value.
async fn next_sequence(pool: &SqlitePool, kind: EntityKind) -> Result<i64, sqlx::Error> {
    let (value,): (i64,) = sqlx::query_as(
        "INSERT INTO id_counters (kind, value) VALUES (?, 1)
         ON CONFLICT(kind) DO UPDATE SET value = value + 1
         RETURNING value",
    )
    .bind(kind.counter_key())
    .fetch_one(pool)
    .await?;
    Ok(value)
}

/// Mint a fresh identifier for an entity of `kind`.
pub async fn mint(pool: &SqlitePool, kind: EntityKind) -> Result<String, sqlx::Error> {
    let sequence = next_sequence(pool, kind).await?;
    Ok(format_id(kind, sequence))
}

fn format_id(kind: EntityKind, sequence: i64) -> String {
    let salt_len = kind.salt_bytes();
    let salt = if salt_len > 0 {
        let mut bytes = vec![0u8; salt_len];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    } else {
        String::new()
    };

    format!("{}{}{:04}", kind.prefix(), salt, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_table() {
        assert_eq!(EntityKind::Client(ClientRole::Customer).prefix(), "C");
        assert_eq!(EntityKind::Client(ClientRole::Supplier).prefix(), "S");
        assert_eq!(EntityKind::Booking.prefix(), "B");
        assert_eq!(EntityKind::Container.prefix(), "CON");
        assert_eq!(EntityKind::Warehouse.prefix(), "W");
    }

    #[test]
    fn test_format_client_has_no_salt() {
        let id = format_id(EntityKind::Client(ClientRole::Customer), 7);
        assert_eq!(id, "C0007");
        let id = format_id(EntityKind::Client(ClientRole::Supplier), 12);
        assert_eq!(id, "S0012");
    }

    #[test]
    fn test_format_salted_kinds() {
        // prefix + 8 hex chars + 4-digit sequence
        let id = format_id(EntityKind::Booking, 1);
        assert_eq!(id.len(), 1 + 8 + 4);
        assert!(id.starts_with('B'));
        assert!(id.ends_with("0001"));

        let id = format_id(EntityKind::Container, 42);
        assert_eq!(id.len(), 3 + 8 + 4);
        assert!(id.starts_with("CON"));
        assert!(id.ends_with("0042"));

        // Warehouse salt is 3 bytes / 6 hex chars
        let id = format_id(EntityKind::Warehouse, 3);
        assert_eq!(id.len(), 1 + 6 + 4);
        assert!(id.starts_with('W'));
        assert!(id.ends_with("0003"));
    }

    #[test]
    fn test_sequence_padding_overflows_gracefully() {
        let id = format_id(EntityKind::Client(ClientRole::Customer), 12345);
        assert_eq!(id, "C12345");
    }

    #[tokio::test]
    async fn test_sequences_are_unique_per_kind() {
        let pool = crate::db::init_memory().await.unwrap();

        let a = next_sequence(&pool, EntityKind::Booking).await.unwrap();
        let b = next_sequence(&pool, EntityKind::Booking).await.unwrap();
        let c = next_sequence(&pool, EntityKind::Booking).await.unwrap();
        assert_eq!((a, b, c), (1, 2, 3));

        // Kinds advance independently
        let w = next_sequence(&pool, EntityKind::Warehouse).await.unwrap();
        assert_eq!(w, 1);
    }

    #[tokio::test]
    async fn test_client_roles_share_one_sequence() {
        let pool = crate::db::init_memory().await.unwrap();

        let customer = mint(&pool, EntityKind::Client(ClientRole::Customer))
            .await
            .unwrap();
        let supplier = mint(&pool, EntityKind::Client(ClientRole::Supplier))
            .await
            .unwrap();
        assert_eq!(customer, "C0001");
        assert_eq!(supplier, "S0002");
    }
}
