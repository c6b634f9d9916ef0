//! Identity provider business logic

use crate::domain::{IdentityProvider, IdentityProviderSummary};
use crate::error::{AppError, Result};
use crate::repository::IdentityProviderRepository;
use metrics::counter;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct IdentityProviderService<R: IdentityProviderRepository> {
    repo: Arc<R>,
}

impl<R: IdentityProviderRepository> IdentityProviderService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a provider. The id is assigned here; anything the client
    /// supplied is overwritten.
    pub async fn create(&self, mut idp: IdentityProvider) -> Result<IdentityProvider> {
        idp.id = Uuid::new_v4().to_string();

        self.repo.create(&idp).await?;

        counter!("idp_registry_operations_total", "operation" => "create").increment(1);
        info!(idp_id = %idp.id, "identity provider created");
        Ok(idp)
    }

    pub async fn list(&self) -> Result<Vec<IdentityProviderSummary>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &str) -> Result<IdentityProvider> {
        if id.is_empty() {
            return Err(AppError::InvalidInput(
                "Missing identity provider id.".to_string(),
            ));
        }

        self.repo.find_by_id(id).await
    }

    /// Update a provider. The path-supplied id is authoritative over
    /// anything in the body.
    pub async fn update(&self, id: &str, mut idp: IdentityProvider) -> Result<IdentityProvider> {
        if id.is_empty() {
            return Err(AppError::InvalidInput(
                "Missing identity provider id.".to_string(),
            ));
        }

        idp.id = id.to_string();
        self.repo.update(&idp).await?;

        counter!("idp_registry_operations_total", "operation" => "update").increment(1);
        info!(idp_id = %id, "identity provider updated");
        Ok(idp)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(AppError::InvalidInput(
                "Missing identity provider id.".to_string(),
            ));
        }

        self.repo.delete(id).await?;

        counter!("idp_registry_operations_total", "operation" => "delete").increment(1);
        info!(idp_id = %id, "identity provider deleted");
        Ok(())
    }
}
