//! Identity provider persistence adapter
//!
//! Sole owner of the `IDP` table: no other module issues SQL against it.
//! Each operation is a single autocommit statement against the pool.

use crate::domain::{IdentityProvider, IdentityProviderSummary};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySqlPool, Row};
use tracing::warn;

// Statement templates for the IDP table. Process-wide immutable; sqlx
// prepares and caches them per connection.
const INSERT_IDP: &str = "INSERT INTO IDP \
    (IDP_ID, NAME, DESCRIPTION, CLIENT_ID, CLIENT_SECRET, REDIRECT_URI, SCOPES) \
    VALUES (?, ?, ?, ?, ?, ?, ?)";

const SELECT_IDP_BY_ID: &str = "SELECT \
    IDP_ID, NAME, DESCRIPTION, CLIENT_ID, CLIENT_SECRET, REDIRECT_URI, SCOPES \
    FROM IDP WHERE IDP_ID = ?";

// The list projection reads only the minimized column set.
const SELECT_IDP_LIST: &str =
    "SELECT IDP_ID, NAME, DESCRIPTION, CLIENT_ID, SCOPES FROM IDP";

const UPDATE_IDP_BY_ID: &str = "UPDATE IDP SET \
    NAME = ?, DESCRIPTION = ?, CLIENT_ID = ?, CLIENT_SECRET = ?, REDIRECT_URI = ?, SCOPES = ? \
    WHERE IDP_ID = ?";

const DELETE_IDP_BY_ID: &str = "DELETE FROM IDP WHERE IDP_ID = ?";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProviderRepository: Send + Sync {
    /// Insert a new provider record. Duplicate ids surface as a database
    /// constraint failure, not a pre-existence check.
    async fn create(&self, idp: &IdentityProvider) -> Result<()>;

    /// All records in their list projection; empty vec when no rows exist.
    async fn list(&self) -> Result<Vec<IdentityProviderSummary>>;

    /// Full record for an exact id match.
    async fn find_by_id(&self, id: &str) -> Result<IdentityProvider>;

    /// Full-record replace by id.
    async fn update(&self, idp: &IdentityProvider) -> Result<()>;

    /// Remove a record by id. Deleting an absent id is a success.
    async fn delete(&self, id: &str) -> Result<()>;
}

pub struct IdentityProviderRepositoryImpl {
    pool: MySqlPool,
}

impl IdentityProviderRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Serialize scopes for the SCOPES column.
fn encode_scopes(scopes: &[String]) -> Result<String> {
    serde_json::to_string(scopes).map_err(|e| AppError::InvalidScopes(e.to_string()))
}

/// The SCOPES column physically arrives as text or as raw bytes depending
/// on the driver; this is the single point normalizing both to a string
/// before JSON decoding.
fn decode_scopes(row: &MySqlRow) -> std::result::Result<Vec<String>, sqlx::Error> {
    let raw: String = match row.try_get::<String, _>("SCOPES") {
        Ok(text) => text,
        Err(_) => {
            let bytes: Vec<u8> = row.try_get("SCOPES")?;
            String::from_utf8(bytes).map_err(|e| sqlx::Error::ColumnDecode {
                index: "SCOPES".to_string(),
                source: Box::new(e),
            })?
        }
    };

    serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: "SCOPES".to_string(),
        source: Box::new(e),
    })
}

// Each column must type-check as its declared storage type; a mismatch
// aborts the row with a column-decode error rather than a partial record.
impl FromRow<'_, MySqlRow> for IdentityProvider {
    fn from_row(row: &MySqlRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("IDP_ID")?,
            name: row.try_get("NAME")?,
            description: row.try_get("DESCRIPTION")?,
            client_id: row.try_get("CLIENT_ID")?,
            client_secret: row.try_get("CLIENT_SECRET")?,
            redirect_uri: row.try_get("REDIRECT_URI")?,
            scopes: decode_scopes(row)?,
        })
    }
}

impl FromRow<'_, MySqlRow> for IdentityProviderSummary {
    fn from_row(row: &MySqlRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("IDP_ID")?,
            name: row.try_get("NAME")?,
            description: row.try_get("DESCRIPTION")?,
            client_id: row.try_get("CLIENT_ID")?,
            scopes: decode_scopes(row)?,
        })
    }
}

fn not_found() -> AppError {
    AppError::NotFound("The identity provider with the specified id does not exist.".to_string())
}

#[async_trait]
impl IdentityProviderRepository for IdentityProviderRepositoryImpl {
    async fn create(&self, idp: &IdentityProvider) -> Result<()> {
        let scopes = encode_scopes(&idp.scopes)?;

        sqlx::query(INSERT_IDP)
            .bind(&idp.id)
            .bind(&idp.name)
            .bind(&idp.description)
            .bind(&idp.client_id)
            .bind(&idp.client_secret)
            .bind(&idp.redirect_uri)
            .bind(&scopes)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<IdentityProviderSummary>> {
        let idps = sqlx::query_as::<_, IdentityProviderSummary>(SELECT_IDP_LIST)
            .fetch_all(&self.pool)
            .await?;

        Ok(idps)
    }

    async fn find_by_id(&self, id: &str) -> Result<IdentityProvider> {
        let mut rows = sqlx::query_as::<_, IdentityProvider>(SELECT_IDP_BY_ID)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        // IDP_ID is the primary key; more than one match is an integrity
        // failure to report, never to resolve silently.
        if rows.len() > 1 {
            return Err(AppError::Integrity(format!(
                "expected at most one row for identity provider {}, found {}",
                id,
                rows.len()
            )));
        }

        match rows.pop() {
            Some(idp) => Ok(idp),
            None => {
                warn!(idp_id = %id, "identity provider not found");
                Err(not_found())
            }
        }
    }

    async fn update(&self, idp: &IdentityProvider) -> Result<()> {
        let scopes = encode_scopes(&idp.scopes)?;

        let result = sqlx::query(UPDATE_IDP_BY_ID)
            .bind(&idp.name)
            .bind(&idp.description)
            .bind(&idp.client_id)
            .bind(&idp.client_secret)
            .bind(&idp.redirect_uri)
            .bind(&scopes)
            .bind(&idp.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(idp_id = %idp.id, "update affected no rows");
            return Err(not_found());
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query(DELETE_IDP_BY_ID)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            // Delete is idempotent from the caller's perspective.
            warn!(idp_id = %id, "delete affected no rows");
        }

        Ok(())
    }
}
