//! Delivery-rate domain types shared by the adapter, the settings store and
//! the HTTP API.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the normalizer treats fee fields it cannot read as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeParsing {
    /// Missing, unparsable or negative fees become `0`.
    #[default]
    Lenient,
    /// Unparsable or negative fees fail the import. Missing fees are still `0`.
    Strict,
}

impl FromStr for FeeParsing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("expected 'lenient' or 'strict', got '{other}'")),
        }
    }
}

/// A merchant's credentials for one logistics provider.
///
/// Owned by the merchant's settings record; the import flow only reads it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredential {
    pub provider: String,
    pub token: String,
    pub guid: Option<String>,
    /// Replaces the registry base URL for this provider when set.
    pub api_url: Option<String>,
}

impl ProviderCredential {
    #[must_use]
    pub fn new(provider: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            token: token.into(),
            guid: None,
            api_url: None,
        }
    }

    #[must_use]
    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// The only part of the token that may appear in logs or API responses.
    #[must_use]
    pub fn token_prefix(&self) -> String {
        token_prefix(&self.token)
    }
}

impl std::fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("provider", &self.provider)
            .field("token", &self.token_prefix())
            .field("guid", &self.guid.as_ref().map(|_| "[redacted]"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Returns at most the first four characters of `token` followed by `…`.
#[must_use]
pub fn token_prefix(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}…")
}

/// One region's delivery fees in the provider-independent shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRate {
    pub region_id: u16,
    /// Arabic name.
    pub region_name_local: String,
    /// French/ASCII name.
    pub region_name_ascii: String,
    pub home_delivery_fee: f64,
    /// `0` means the provider does not offer stop-desk delivery to this region.
    #[serde(default)]
    pub stop_desk_fee: f64,
}

impl DeliveryRate {
    #[must_use]
    pub fn supports_stop_desk(&self) -> bool {
        self.stop_desk_fee > 0.0
    }
}
