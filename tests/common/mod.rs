//! Common test utilities
//!
//! The router is generic over `HasIdentityProviders`, so these tests run
//! against an in-memory repository instead of a live database.

use async_trait::async_trait;
use axum::Router;
use idp_registry::domain::{IdentityProvider, IdentityProviderSummary};
use idp_registry::error::{AppError, Result};
use idp_registry::repository::IdentityProviderRepository;
use idp_registry::server::build_router;
use idp_registry::service::IdentityProviderService;
use idp_registry::state::HasIdentityProviders;
use std::sync::{Arc, Mutex};

fn not_found() -> AppError {
    AppError::NotFound("The identity provider with the specified id does not exist.".to_string())
}

/// In-memory repository with the same contract as the MySQL adapter,
/// including the idempotent-delete leniency. Insertion order is kept so
/// list assertions are stable.
#[derive(Default)]
pub struct InMemoryIdentityProviderRepository {
    rows: Mutex<Vec<IdentityProvider>>,
}

#[async_trait]
impl IdentityProviderRepository for InMemoryIdentityProviderRepository {
    async fn create(&self, idp: &IdentityProvider) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        rows.push(idp.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<IdentityProviderSummary>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .map(|idp| IdentityProviderSummary {
                id: idp.id.clone(),
                name: idp.name.clone(),
                description: idp.description.clone(),
                client_id: idp.client_id.clone(),
                scopes: idp.scopes.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<IdentityProvider> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|idp| idp.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update(&self, idp: &IdentityProvider) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|row| row.id == idp.id) {
            Some(row) => {
                *row = idp.clone();
                Ok(())
            }
            None => Err(not_found()),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|row| row.id != id);
        Ok(())
    }
}

#[derive(Clone)]
pub struct TestState {
    service: Arc<IdentityProviderService<InMemoryIdentityProviderRepository>>,
}

impl TestState {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryIdentityProviderRepository::default());
        Self {
            service: Arc::new(IdentityProviderService::new(repo)),
        }
    }
}

impl HasIdentityProviders for TestState {
    type IdpRepo = InMemoryIdentityProviderRepository;

    fn identity_provider_service(&self) -> &IdentityProviderService<Self::IdpRepo> {
        &self.service
    }

    async fn check_ready(&self) -> bool {
        true
    }
}

/// Build the full router backed by a fresh in-memory repository.
pub fn test_router() -> Router {
    build_router(TestState::new(), None)
}
