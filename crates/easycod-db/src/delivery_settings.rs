//! Database operations for the `delivery_settings` table: a shop's chosen
//! provider, its credentials, and the manually-entered fallback rates.

use chrono::{DateTime, Utc};
use easycod_core::{token_prefix, DeliveryRate, ProviderCredential};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

const SELECT_COLUMNS: &str = "shop, api_provider, api_token, user_guid, api_url, manual_rates, \
                              created_at, updated_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `delivery_settings` table.
#[derive(Clone, sqlx::FromRow)]
pub struct DeliverySettingsRow {
    pub shop: String,
    pub api_provider: Option<String>,
    pub api_token: Option<String>,
    pub user_guid: Option<String>,
    pub api_url: Option<String>,
    pub manual_rates: Json<Vec<DeliveryRate>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeliverySettingsRow {
    /// The stored credential, when both a provider and a token are set.
    #[must_use]
    pub fn credential(&self) -> Option<ProviderCredential> {
        let provider = self.api_provider.as_deref().filter(|p| !p.is_empty())?;
        let token = self.api_token.as_deref().filter(|t| !t.is_empty())?;
        Some(ProviderCredential {
            provider: provider.to_owned(),
            token: token.to_owned(),
            guid: self.user_guid.clone(),
            api_url: self.api_url.clone(),
        })
    }

    #[must_use]
    pub fn manual_rates(&self) -> &[DeliveryRate] {
        &self.manual_rates.0
    }
}

impl std::fmt::Debug for DeliverySettingsRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliverySettingsRow")
            .field("shop", &self.shop)
            .field("api_provider", &self.api_provider)
            .field("api_token", &self.api_token.as_deref().map(token_prefix))
            .field("user_guid", &self.user_guid.as_ref().map(|_| "[redacted]"))
            .field("api_url", &self.api_url)
            .field("manual_rates", &self.manual_rates.0.len())
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Fetch the settings row for `shop`, or `None` if the shop has none yet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_delivery_settings(
    pool: &PgPool,
    shop: &str,
) -> Result<Option<DeliverySettingsRow>, DbError> {
    let row = sqlx::query_as::<_, DeliverySettingsRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM delivery_settings WHERE shop = $1"
    ))
    .bind(shop)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Store `credential` as the shop's provider, creating the row if needed.
/// Manual rates are left untouched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_provider_credential(
    pool: &PgPool,
    shop: &str,
    credential: &ProviderCredential,
) -> Result<DeliverySettingsRow, DbError> {
    let row = sqlx::query_as::<_, DeliverySettingsRow>(&format!(
        "INSERT INTO delivery_settings (shop, api_provider, api_token, user_guid, api_url) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (shop) DO UPDATE SET \
             api_provider = EXCLUDED.api_provider, \
             api_token = EXCLUDED.api_token, \
             user_guid = EXCLUDED.user_guid, \
             api_url = EXCLUDED.api_url, \
             updated_at = NOW() \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(shop)
    .bind(&credential.provider)
    .bind(&credential.token)
    .bind(credential.guid.as_deref())
    .bind(credential.api_url.as_deref())
    .fetch_one(pool)
    .await?;

    tracing::info!(
        shop,
        provider = %credential.provider,
        token = %credential.token_prefix(),
        "stored delivery provider credential"
    );
    Ok(row)
}

/// Remove the shop's provider and credentials, keeping its manual rates.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the shop has no settings row, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn clear_provider_credential(pool: &PgPool, shop: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE delivery_settings \
         SET api_provider = NULL, api_token = NULL, user_guid = NULL, api_url = NULL, \
             updated_at = NOW() \
         WHERE shop = $1",
    )
    .bind(shop)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Replace the shop's manual fallback rates, creating the row if needed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn save_manual_rates(
    pool: &PgPool,
    shop: &str,
    rates: &[DeliveryRate],
) -> Result<DeliverySettingsRow, DbError> {
    let row = sqlx::query_as::<_, DeliverySettingsRow>(&format!(
        "INSERT INTO delivery_settings (shop, manual_rates) \
         VALUES ($1, $2) \
         ON CONFLICT (shop) DO UPDATE SET \
             manual_rates = EXCLUDED.manual_rates, \
             updated_at = NOW() \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(shop)
    .bind(Json(rates))
    .fetch_one(pool)
    .await?;

    tracing::info!(shop, rates = rates.len(), "saved manual delivery rates");
    Ok(row)
}
