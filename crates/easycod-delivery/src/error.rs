use thiserror::Error;

/// Errors returned by the delivery-rate import flow.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Missing or malformed input, detected before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The provider id is not in the registry.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The provider answered with a non-2xx status.
    #[error("{provider} returned HTTP {status}: {body}")]
    UpstreamHttp {
        provider: String,
        status: u16,
        body: String,
    },

    /// Transport-level failure: DNS, connect, timeout, TLS.
    #[error("import failed for {provider}: {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider body was not the JSON shape we expect.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A fee could not be read as a non-negative number under strict parsing.
    #[error("invalid {field} for region {region_id}: {raw}")]
    InvalidFee {
        region_id: u16,
        field: &'static str,
        raw: String,
    },
}

impl DeliveryError {
    /// Whether the error was raised before any request left the process.
    #[must_use]
    pub fn is_rejected_before_fetch(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnsupportedProvider(_))
    }
}
