//! Application state traits for dependency injection
//!
//! Handlers are generic over this trait so the same routing code serves
//! both the production `AppState` and lightweight test states.

use crate::repository::IdentityProviderRepository;
use crate::service::IdentityProviderService;

/// Trait for application state that provides the identity provider service.
pub trait HasIdentityProviders: Clone + Send + Sync + 'static {
    /// The identity provider repository type
    type IdpRepo: IdentityProviderRepository;

    /// Get the identity provider service
    fn identity_provider_service(&self) -> &IdentityProviderService<Self::IdpRepo>;

    /// Check whether the backing store is reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
