//! Identity provider domain model

use serde::{Deserialize, Serialize};

/// A configured external identity provider connection.
///
/// This is the full record, client secret included; it is what create and
/// update respond with. List and single-record reads use the reduced
/// projections below instead.
///
/// Request bodies decode into this type as well: absent fields default,
/// and any client-supplied `id` is discarded by the service layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityProvider {
    pub id: String,
    pub name: String,
    pub description: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

/// List projection: the client secret and redirect URI are deliberately
/// omitted (data minimization).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProviderSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub client_id: String,
    pub scopes: Vec<String>,
}

/// Single-record projection: every field except the client secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProviderDetails {
    pub id: String,
    pub name: String,
    pub description: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl From<IdentityProvider> for IdentityProviderDetails {
    fn from(idp: IdentityProvider) -> Self {
        Self {
            id: idp.id,
            name: idp.name,
            description: idp.description,
            client_id: idp.client_id,
            redirect_uri: idp.redirect_uri,
            scopes: idp.scopes,
        }
    }
}
