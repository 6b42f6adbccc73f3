//! # Client Operations
//!
//! CRUD for the client roster. The phone number doubles as the login
//! for the client-facing portal, so it is unique and required.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::CreditService;
use fiado_core::{validation, Client};
use fiado_db::repository::client::generate_client_id;

/// A new client registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub id_document: Option<String>,
}

/// Editable client fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<Option<String>>,
    #[serde(default)]
    pub address: Option<Option<String>>,
    #[serde(default)]
    pub city: Option<Option<String>>,
    #[serde(default)]
    pub id_document: Option<Option<String>>,
}

impl CreditService {
    /// Registers a new client.
    pub async fn create_client(&self, request: NewClient) -> ServiceResult<Client> {
        validation::validate_person_name("firstName", &request.first_name)?;
        validation::validate_person_name("lastName", &request.last_name)?;
        validation::validate_phone(&request.phone)?;

        let now = Utc::now();
        let client = Client {
            id: generate_client_id(),
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            email: request.email,
            address: request.address,
            city: request.city,
            id_document: request.id_document,
            portal_password_hash: None,
            created_at: now,
            updated_at: now,
        };

        self.db().clients().insert(&client).await?;

        info!(client_id = %client.id, "Client registered");

        Ok(client)
    }

    /// Gets a client by ID.
    pub async fn get_client(&self, id: &str) -> ServiceResult<Client> {
        self.db()
            .clients()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Client", id))
    }

    /// Lists clients.
    pub async fn list_clients(&self, limit: u32) -> ServiceResult<Vec<Client>> {
        Ok(self.db().clients().list(limit).await?)
    }

    /// Applies a partial update to a client.
    pub async fn update_client(&self, id: &str, update: ClientUpdate) -> ServiceResult<Client> {
        let mut client = self.get_client(id).await?;

        if let Some(first_name) = update.first_name {
            validation::validate_person_name("firstName", &first_name)?;
            client.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            validation::validate_person_name("lastName", &last_name)?;
            client.last_name = last_name;
        }
        if let Some(phone) = update.phone {
            validation::validate_phone(&phone)?;
            client.phone = phone;
        }
        if let Some(email) = update.email {
            client.email = email;
        }
        if let Some(address) = update.address {
            client.address = address;
        }
        if let Some(city) = update.city {
            client.city = city;
        }
        if let Some(id_document) = update.id_document {
            client.id_document = id_document;
        }
        client.updated_at = Utc::now();

        self.db().clients().update(&client).await?;

        Ok(client)
    }

    /// Deletes a client. Fails while sales still reference them.
    pub async fn delete_client(&self, id: &str) -> ServiceResult<()> {
        self.db().clients().delete(id).await?;
        info!(client_id = %id, "Client deleted");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_credit_sale, service};
    use crate::ErrorCode;
    use fiado_core::{PaymentInterval, PaymentMethod};

    fn new_client(name: &str, phone: &str) -> NewClient {
        NewClient {
            first_name: name.to_string(),
            last_name: "Tester".to_string(),
            phone: phone.to_string(),
            email: None,
            address: None,
            city: None,
            id_document: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_client() {
        let svc = service().await;
        let created = svc.create_client(new_client("Rosa", "5556000001")).await.unwrap();

        let fetched = svc.get_client(&created.id).await.unwrap();
        assert_eq!(fetched.phone, "5556000001");
        assert_eq!(fetched.full_name(), created.full_name());
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let svc = service().await;
        svc.create_client(new_client("Rosa", "5556000002")).await.unwrap();

        let err = svc
            .create_client(new_client("Imposter", "5556000002"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("already exists"));
    }

    #[tokio::test]
    async fn test_invalid_phone_rejected() {
        let svc = service().await;
        let err = svc.create_client(new_client("Rosa", "abc")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_delete_blocked_while_sales_reference_client() {
        let svc = service().await;
        let client = svc.create_client(new_client("Hugo", "5556000003")).await.unwrap();
        let sale = seed_credit_sale(
            &svc,
            &client.id,
            20_000,
            2_000,
            PaymentInterval::Weekly,
            chrono::Utc::now(),
        )
        .await;

        let err = svc.delete_client(&client.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Still blocked after settlement: recorded history stays owned.
        svc.register_payment(&sale.id, 20_000, PaymentMethod::Cash, None)
            .await
            .unwrap();
        let err = svc.delete_client(&client.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // The client is untouched by the failed deletes.
        assert!(svc.get_client(&client.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_client_without_sales() {
        let svc = service().await;
        let client = svc.create_client(new_client("Lola", "5556000004")).await.unwrap();

        svc.delete_client(&client.id).await.unwrap();

        let err = svc.get_client(&client.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_named_fields() {
        let svc = service().await;
        let client = svc.create_client(new_client("Rosa", "5556000005")).await.unwrap();

        let updated = svc
            .update_client(
                &client.id,
                ClientUpdate {
                    city: Some(Some("Puebla".to_string())),
                    ..ClientUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.city.as_deref(), Some("Puebla"));
        assert_eq!(updated.first_name, "Rosa");
        assert_eq!(updated.phone, "5556000005");
    }
}
