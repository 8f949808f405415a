//! # Client Commands
//!
//! `register-client` and `client`.

use rental_core::Client;
use rental_db::Database;
use serde::Serialize;

use crate::error::CliError;

/// Client DTO for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        ClientDto {
            id: client.id.get(),
            name: client.name,
            email: client.email,
        }
    }
}

/// Registers a client.
pub async fn register_client(db: &Database, name: &str, email: &str) -> Result<ClientDto, CliError> {
    let client = db.clients().register(name, email).await?;
    Ok(client.into())
}

/// Looks a client up by exact email.
pub async fn get_client_by_email(db: &Database, email: &str) -> Result<ClientDto, CliError> {
    let client = db.clients().get_by_email(email).await?;
    Ok(client.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rental_db::DbConfig;

    #[tokio::test]
    async fn test_register_then_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let registered = register_client(&db, "John Doe", "john.doe@example.com")
            .await
            .unwrap();
        let found = get_client_by_email(&db, "john.doe@example.com").await.unwrap();
        assert_eq!(found, registered);

        let err = register_client(&db, "John Again", "john.doe@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateEmail);

        let err = get_client_by_email(&db, "JOHN.DOE@example.com").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
