//! HTTP client for provider fee endpoints.
//!
//! [`RateClient::import_rates`] validates the merchant's credentials, resolves
//! the provider, performs the scheme-specific call(s) and returns normalized
//! rates. Nothing is retried; upstream and transport errors abort the import.

use std::time::Duration;

use easycod_core::{AppConfig, DeliveryRate, FeeParsing, ProviderCredential};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DeliveryError;
use crate::maystro;
use crate::normalize::normalize_fee_entries;
use crate::registry::{resolve_provider, AuthScheme, ProviderSpec};
use crate::types::{EcotrackFeesResponse, NoestFeesResponse};

const NOEST_FEES_PATH: &str = "api/public/fees";
const ECOTRACK_FEES_PATH: &str = "api/v1/get/fees";

/// Upstream error bodies longer than this are cut before being surfaced.
const MAX_ERROR_BODY_CHARS: usize = 1_024;

#[derive(Debug, Clone)]
pub struct RateClientConfig {
    /// `None` leaves the request timeout to the HTTP client default.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
    pub fee_parsing: FeeParsing,
    pub maystro_max_concurrent_regions: usize,
}

impl Default for RateClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: "easycod/0.1 (delivery-rates)".to_string(),
            fee_parsing: FeeParsing::Lenient,
            maystro_max_concurrent_regions: 16,
        }
    }
}

impl RateClientConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.delivery_timeout_secs,
            user_agent: config.delivery_user_agent.clone(),
            fee_parsing: config.fee_parsing,
            maystro_max_concurrent_regions: config.maystro_max_concurrent_regions,
        }
    }
}

/// Result of one import run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub provider: String,
    pub rates: Vec<DeliveryRate>,
    /// Regions dropped because their lookups failed. Only the Maystro fan-out
    /// can produce a partial result.
    pub failed_regions: Vec<u16>,
}

impl ImportOutcome {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failed_regions.is_empty()
    }
}

/// Validated request: resolved provider plus the endpoint actually used.
struct ResolvedRequest<'a> {
    spec: &'static ProviderSpec,
    base_url: Url,
    token: &'a str,
    guid: Option<&'a str>,
}

/// Client for provider fee lookups. Cheap to share behind an `Arc`.
pub struct RateClient {
    client: Client,
    config: RateClientConfig,
}

impl RateClient {
    /// # Errors
    ///
    /// Returns [`DeliveryError::Validation`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(config: RateClientConfig) -> Result<Self, DeliveryError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DeliveryError::Validation(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &RateClientConfig {
        &self.config
    }

    /// Imports and normalizes the delivery rates for `credential`.
    ///
    /// # Errors
    ///
    /// - [`DeliveryError::Validation`] / [`DeliveryError::UnsupportedProvider`]
    ///   before any network call.
    /// - [`DeliveryError::UpstreamHttp`] on a non-2xx provider response.
    /// - [`DeliveryError::Network`] on transport failure.
    /// - [`DeliveryError::Deserialize`] if the body is not the expected shape.
    /// - [`DeliveryError::InvalidFee`] under strict fee parsing.
    pub async fn import_rates(
        &self,
        credential: &ProviderCredential,
    ) -> Result<ImportOutcome, DeliveryError> {
        let request = resolve_request(credential)?;
        let provider = request.spec.id;

        tracing::info!(
            provider,
            token = %credential.token_prefix(),
            base_url = %request.base_url,
            "importing delivery rates"
        );

        let (rates, failed_regions) = match request.spec.scheme {
            AuthScheme::TokenGuid => (self.fetch_token_guid(&request).await?, Vec::new()),
            AuthScheme::Bearer => (self.fetch_bearer(&request).await?, Vec::new()),
            AuthScheme::Maystro => {
                maystro::fetch_rates(self, provider, &request.base_url, request.token).await?
            }
        };

        tracing::info!(
            provider,
            rates = rates.len(),
            failed_regions = failed_regions.len(),
            "delivery rate import finished"
        );

        Ok(ImportOutcome {
            provider: provider.to_owned(),
            rates,
            failed_regions,
        })
    }

    /// Noest: token and GUID travel as query parameters.
    async fn fetch_token_guid(
        &self,
        request: &ResolvedRequest<'_>,
    ) -> Result<Vec<DeliveryRate>, DeliveryError> {
        let provider = request.spec.id;
        let url = endpoint(&request.base_url, NOEST_FEES_PATH)?;
        let builder = self.client.get(url).query(&[
            ("api_token", request.token),
            ("user_guid", request.guid.unwrap_or_default()),
        ]);

        let body: NoestFeesResponse = self.send_json(provider, builder).await?;
        tracing::debug!(provider, entries = body.tarifs.delivery.len(), "fee collection received");
        normalize_fee_entries(body.tarifs.delivery.into_entries(), self.config.fee_parsing)
    }

    /// EcoTrack family: one GET with a bearer token, flat fee array back.
    async fn fetch_bearer(
        &self,
        request: &ResolvedRequest<'_>,
    ) -> Result<Vec<DeliveryRate>, DeliveryError> {
        let provider = request.spec.id;
        let url = endpoint(&request.base_url, ECOTRACK_FEES_PATH)?;
        let builder = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", request.token));

        let body: EcotrackFeesResponse = self.send_json(provider, builder).await?;
        let entries = body.into_entries().into_iter().map(|e| (None, e)).collect();
        normalize_fee_entries(entries, self.config.fee_parsing)
    }

    /// Sends `builder`, maps non-2xx to [`DeliveryError::UpstreamHttp`] and
    /// parses the body as `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        provider: &str,
        builder: RequestBuilder,
    ) -> Result<T, DeliveryError> {
        // Credentials can sit in the query string; keep the URL out of the error.
        let network = |source: reqwest::Error| DeliveryError::Network {
            provider: provider.to_owned(),
            source: source.without_url(),
        };

        let response = builder.send().await.map_err(network)?;
        let status = response.status();
        let body = response.text().await.map_err(network)?;

        if !status.is_success() {
            tracing::warn!(provider, status = status.as_u16(), "provider rejected fee request");
            return Err(DeliveryError::UpstreamHttp {
                provider: provider.to_owned(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| DeliveryError::Deserialize {
            context: format!("{provider} fee response"),
            source: e,
        })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }
}

/// Checks `credential` the same way [`RateClient::import_rates`] does, without
/// any network I/O. Used to reject bad settings before they are stored.
///
/// # Errors
///
/// Returns [`DeliveryError::Validation`] or [`DeliveryError::UnsupportedProvider`].
pub fn validate_credential(
    credential: &ProviderCredential,
) -> Result<&'static ProviderSpec, DeliveryError> {
    resolve_request(credential).map(|request| request.spec)
}

/// Validates `credential` and resolves the provider and endpoint, in the
/// order: provider id present, provider known, token present, GUID present
/// for token+GUID providers, override URL well-formed.
fn resolve_request(credential: &ProviderCredential) -> Result<ResolvedRequest<'_>, DeliveryError> {
    if credential.provider.trim().is_empty() {
        return Err(DeliveryError::Validation("apiProvider is required".into()));
    }
    let spec = resolve_provider(&credential.provider)?;

    let token = credential.token.trim();
    if token.is_empty() {
        return Err(DeliveryError::Validation("apiToken is required".into()));
    }

    let guid = credential
        .guid
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty());
    if spec.scheme == AuthScheme::TokenGuid && guid.is_none() {
        return Err(DeliveryError::Validation(format!(
            "userGuid is required for {}",
            spec.id
        )));
    }

    let raw_base = credential
        .api_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(spec.base_url);
    let base_url = parse_base_url(raw_base)?;

    Ok(ResolvedRequest {
        spec,
        base_url,
        token,
        guid,
    })
}

/// Parses a base URL so that it always ends with exactly one slash, letting
/// relative endpoint paths extend it instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, DeliveryError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    let url = Url::parse(&normalised)
        .map_err(|e| DeliveryError::Validation(format!("invalid apiUrl '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DeliveryError::Validation(format!(
            "invalid apiUrl '{raw}': scheme must be http or https"
        )));
    }
    Ok(url)
}

pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, DeliveryError> {
    base_url
        .join(path)
        .map_err(|e| DeliveryError::Validation(format!("invalid endpoint '{path}': {e}")))
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_owned();
    }
    let mut cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push('…');
    cut
}
