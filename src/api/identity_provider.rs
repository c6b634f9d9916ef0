//! Identity provider API handlers

use crate::domain::{IdentityProvider, IdentityProviderDetails, IdentityProviderSummary};
use crate::error::{AppError, Result};
use crate::state::HasIdentityProviders;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

const MALFORMED_BODY: &str = "The request body is malformed or contains invalid data.";

/// Create an identity provider
pub async fn create<S: HasIdentityProviders>(
    State(state): State<S>,
    payload: std::result::Result<Json<IdentityProvider>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(idp) = payload.map_err(|_| AppError::InvalidInput(MALFORMED_BODY.to_string()))?;

    let created = state.identity_provider_service().create(idp).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List identity providers (minimized projection)
pub async fn list<S: HasIdentityProviders>(
    State(state): State<S>,
) -> Result<Json<Vec<IdentityProviderSummary>>> {
    let idps = state.identity_provider_service().list().await?;
    Ok(Json(idps))
}

/// Get an identity provider by id (secret excluded)
pub async fn get<S: HasIdentityProviders>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<Json<IdentityProviderDetails>> {
    let idp = state.identity_provider_service().get(&id).await?;
    Ok(Json(IdentityProviderDetails::from(idp)))
}

/// Update an identity provider; the path id wins over the body id
pub async fn update<S: HasIdentityProviders>(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<IdentityProvider>, JsonRejection>,
) -> Result<Json<IdentityProvider>> {
    let Json(idp) = payload.map_err(|_| AppError::InvalidInput(MALFORMED_BODY.to_string()))?;

    let updated = state.identity_provider_service().update(&id, idp).await?;
    Ok(Json(updated))
}

/// Delete an identity provider (idempotent)
pub async fn delete<S: HasIdentityProviders>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.identity_provider_service().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Cross-origin preflight on the provider routes
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
