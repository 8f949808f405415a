//! # Client Repository
//!
//! Database operations for clients.
//!
//! Email uniqueness is enforced by the `UNIQUE` index on `clients.email`, not
//! by a read-then-insert check, so two racing registrations cannot both win.
//!
//! Names and emails are trimmed on the way in (registration and lookup), so
//! `" john.doe@example.com "` and `"john.doe@example.com"` are the same key.

use rental_core::validation::{validate_client_name, validate_email};
use rental_core::{Client, ClientId};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Registers a new client.
    ///
    /// Surrounding whitespace is stripped from `name` and `email`; the
    /// trimmed values are what gets validated, stored and returned.
    ///
    /// ## Returns
    /// * `Ok(Client)` - The stored client with its generated id
    /// * `Err(DbError::DuplicateEmail)` - Email already registered; the
    ///   existing client is left untouched
    /// * `Err(DbError::Validation)` - Empty name or malformed email
    pub async fn register(&self, name: &str, email: &str) -> DbResult<Client> {
        let name = name.trim();
        let email = email.trim();

        validate_client_name(name)?;
        validate_email(email)?;

        debug!(email = %email, "Registering client");

        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, email)
            VALUES (?1, ?2)
            "#,
        )
        .bind(name)
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::DuplicateEmail {
                email: email.to_string(),
            },
            other => other,
        })?;

        let client = Client {
            id: ClientId(result.last_insert_rowid()),
            name: name.to_string(),
            email: email.to_string(),
        };

        info!(client_id = %client.id, "Client registered");
        Ok(client)
    }

    /// Looks a client up by email (exact, case-sensitive match after
    /// trimming).
    ///
    /// ## Returns
    /// * `Ok(Client)` - Client found
    /// * `Err(DbError::NotFound)` - No client with this email
    pub async fn get_by_email(&self, email: &str) -> DbResult<Client> {
        let email = email.trim();

        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email
            FROM clients
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Client", email))
    }

    /// Gets a client by its ID.
    pub async fn get_by_id(&self, id: ClientId) -> DbResult<Client> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Client", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repository::test_support::memory_db;

    #[tokio::test]
    async fn test_register_and_lookup() {
        let db = memory_db().await;
        let repo = db.clients();

        let client = repo
            .register("John Doe", "john.doe@example.com")
            .await
            .unwrap();

        let by_email = repo.get_by_email("john.doe@example.com").await.unwrap();
        assert_eq!(by_email, client);

        let by_id = repo.get_by_id(client.id).await.unwrap();
        assert_eq!(by_id.name, "John Doe");
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = memory_db().await;
        let repo = db.clients();

        let first = repo
            .register("John Doe", "john.doe@example.com")
            .await
            .unwrap();

        let err = repo
            .register("Johnny Impostor", "john.doe@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::DuplicateEmail { ref email } if email == "john.doe@example.com"));
        assert_eq!(err.kind(), ErrorKind::DuplicateEmail);

        // First registration is unaffected
        let stored = repo.get_by_email("john.doe@example.com").await.unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_padded_email_is_same_key() {
        let db = memory_db().await;
        let repo = db.clients();

        let padded = repo
            .register("  John Doe ", " john.doe@example.com ")
            .await
            .unwrap();
        assert_eq!(padded.name, "John Doe");
        assert_eq!(padded.email, "john.doe@example.com");

        let stored = repo.get_by_email("john.doe@example.com").await.unwrap();
        assert_eq!(stored, padded);

        let err = repo
            .register("John Doe", "john.doe@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateEmail);

        let found = repo.get_by_email("\tjohn.doe@example.com\n").await.unwrap();
        assert_eq!(found.id, padded.id);
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let db = memory_db().await;
        let err = db
            .clients()
            .get_by_email("nobody@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let db = memory_db().await;
        let repo = db.clients();

        let err = repo.register("", "john.doe@example.com").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = repo.register("John Doe", "not-an-email").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
