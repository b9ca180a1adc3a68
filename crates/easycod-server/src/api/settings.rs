//! Per-shop delivery settings: stored credentials, manual fallback rates, and
//! rate lookups that choose between the two.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use easycod_core::{token_prefix, DeliveryRate, ProviderCredential};
use easycod_db::DeliverySettingsRow;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::delivery::CredentialRequest;
use super::{map_db_error, map_delivery_error, ApiError, ApiResponse, AppState};

const MAX_SHOP_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ManualRatesRequest {
    pub rates: Vec<DeliveryRate>,
}

/// Settings as returned to the merchant UI. The token is reduced to its prefix.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct SettingsView {
    pub shop: String,
    pub api_provider: Option<String>,
    pub token_prefix: Option<String>,
    pub has_user_guid: bool,
    pub api_url: Option<String>,
    pub manual_rates: Vec<DeliveryRate>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeliverySettingsRow> for SettingsView {
    fn from(row: DeliverySettingsRow) -> Self {
        Self {
            token_prefix: row.api_token.as_deref().map(token_prefix),
            has_user_guid: row.user_guid.is_some(),
            shop: row.shop,
            api_provider: row.api_provider,
            api_url: row.api_url,
            manual_rates: row.manual_rates.0,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(in crate::api) enum RateSource {
    Live,
    Manual,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct ShopRatesView {
    pub source: RateSource,
    pub provider: Option<String>,
    pub rates: Vec<DeliveryRate>,
    pub failed_regions: Vec<u16>,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_shop(req_id: &str, shop: &str) -> Result<(), ApiError> {
    if shop.trim().is_empty() || shop.chars().count() > MAX_SHOP_LEN {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("shop must be between 1 and {MAX_SHOP_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_manual_rates(req_id: &str, rates: &[DeliveryRate]) -> Result<(), ApiError> {
    let mut seen = std::collections::HashSet::new();
    for rate in rates {
        let fees_ok = [rate.home_delivery_fee, rate.stop_desk_fee]
            .iter()
            .all(|fee| fee.is_finite() && *fee >= 0.0);
        if !fees_ok {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                format!("fees for region {} must be non-negative numbers", rate.region_id),
            ));
        }
        if !seen.insert(rate.region_id) {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                format!("region {} appears more than once", rate.region_id),
            ));
        }
    }
    Ok(())
}

async fn load_settings(
    state: &AppState,
    req_id: &str,
    shop: &str,
) -> Result<DeliverySettingsRow, ApiError> {
    easycod_db::get_delivery_settings(&state.pool, shop)
        .await
        .map_err(|e| map_db_error(req_id.to_owned(), &e))?
        .ok_or_else(|| ApiError::new(req_id, "not_found", "no delivery settings for this shop"))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/shops/{shop}/delivery-settings
pub(in crate::api) async fn get_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<SettingsView>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    let row = load_settings(&state, rid, &shop).await?;
    Ok(ApiResponse::new(rid, SettingsView::from(row)))
}

/// PUT /api/v1/shops/{shop}/delivery-settings: store provider credentials.
///
/// Credentials are checked against the registry first, so an unsupported
/// provider or a missing GUID is never persisted.
pub(in crate::api) async fn put_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Json(body): Json<CredentialRequest>,
) -> Result<Json<ApiResponse<SettingsView>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;

    let credential = ProviderCredential::from(body);
    easycod_delivery::validate_credential(&credential)
        .map_err(|e| map_delivery_error(rid, &e))?;

    let row = easycod_db::upsert_provider_credential(&state.pool, &shop, &credential)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(ApiResponse::new(rid, SettingsView::from(row)))
}

/// DELETE /api/v1/shops/{shop}/delivery-settings: forget the provider, keep manual rates.
pub(in crate::api) async fn delete_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    easycod_db::clear_provider_credential(&state.pool, &shop)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/shops/{shop}/delivery-rates/manual: replace the fallback rates.
pub(in crate::api) async fn put_manual_rates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
    Json(body): Json<ManualRatesRequest>,
) -> Result<Json<ApiResponse<SettingsView>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    validate_manual_rates(rid, &body.rates)?;

    let row = easycod_db::save_manual_rates(&state.pool, &shop, &body.rates)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(ApiResponse::new(rid, SettingsView::from(row)))
}

/// GET /api/v1/shops/{shop}/delivery-rates: live rates when a provider is
/// configured, the manual fallback otherwise.
pub(in crate::api) async fn get_shop_rates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<ShopRatesView>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    let row = load_settings(&state, rid, &shop).await?;

    let view = match row.credential() {
        Some(credential) => {
            let outcome = state
                .rates
                .import_rates(&credential)
                .await
                .map_err(|e| map_delivery_error(rid, &e))?;
            ShopRatesView {
                source: RateSource::Live,
                provider: Some(outcome.provider),
                rates: outcome.rates,
                failed_regions: outcome.failed_regions,
            }
        }
        None => ShopRatesView {
            source: RateSource::Manual,
            provider: None,
            rates: row.manual_rates.0,
            failed_regions: Vec::new(),
        },
    };

    Ok(ApiResponse::new(rid, view))
}

/// POST /api/v1/shops/{shop}/delivery-rates/import: import with the stored
/// credentials and keep the result as the shop's manual fallback.
pub(in crate::api) async fn import_shop_rates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(shop): Path<String>,
) -> Result<Json<ApiResponse<ShopRatesView>>, ApiError> {
    let rid = &req_id.0;
    validate_shop(rid, &shop)?;
    let row = load_settings(&state, rid, &shop).await?;

    let credential = row.credential().ok_or_else(|| {
        ApiError::new(
            rid,
            "validation_error",
            "no delivery provider is configured for this shop",
        )
    })?;

    let outcome = state
        .rates
        .import_rates(&credential)
        .await
        .map_err(|e| map_delivery_error(rid, &e))?;

    if outcome.rates.is_empty() && outcome.is_partial() {
        tracing::warn!(shop = %shop, provider = %outcome.provider, "no region could be priced");
        return Err(ApiError::new(
            rid,
            "upstream_error",
            format!(
                "{} could not price any region; manual rates were kept",
                outcome.provider
            ),
        ));
    }

    if outcome.is_partial() {
        tracing::warn!(
            shop = %shop,
            failed_regions = ?outcome.failed_regions,
            "saving partial import as manual rates"
        );
    }

    easycod_db::save_manual_rates(&state.pool, &shop, &outcome.rates)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(ApiResponse::new(
        rid,
        ShopRatesView {
            source: RateSource::Live,
            provider: Some(outcome.provider),
            rates: outcome.rates,
            failed_regions: outcome.failed_regions,
        },
    ))
}
