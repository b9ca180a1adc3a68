//! Provider listing and ad-hoc rate import.

use axum::{extract::State, Extension, Json};
use easycod_core::ProviderCredential;
use easycod_delivery::{supported_providers, ImportOutcome, ProviderSpec};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_delivery_error, ApiError, ApiResponse, AppState};

/// Credentials as sent by the merchant settings form.
///
/// Fields default to empty so a missing value surfaces as a validation error
/// from the import flow rather than a body-parsing rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct CredentialRequest {
    #[serde(default)]
    pub api_provider: String,
    #[serde(default)]
    pub api_token: String,
    pub user_guid: Option<String>,
    pub api_url: Option<String>,
}

impl From<CredentialRequest> for ProviderCredential {
    fn from(req: CredentialRequest) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        ProviderCredential {
            provider: req.api_provider.trim().to_ascii_lowercase(),
            token: req.api_token.trim().to_owned(),
            guid: non_blank(req.user_guid),
            api_url: non_blank(req.api_url),
        }
    }
}

/// GET /api/v1/delivery/providers
pub(in crate::api) async fn list_providers(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<&'static [ProviderSpec]>> {
    ApiResponse::new(&req_id.0, supported_providers())
}

/// POST /api/v1/delivery/rates/import: fetch and normalize without storing.
pub(in crate::api) async fn import_rates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CredentialRequest>,
) -> Result<Json<ApiResponse<ImportOutcome>>, ApiError> {
    let credential = ProviderCredential::from(body);
    let outcome = state
        .rates
        .import_rates(&credential)
        .await
        .map_err(|e| map_delivery_error(&req_id.0, &e))?;

    Ok(ApiResponse::new(&req_id.0, outcome))
}
