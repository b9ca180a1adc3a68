//! Static provider registry: provider id → base URL and auth scheme.
//!
//! The EcoTrack resellers all share one request/response shape, so they are
//! rows in [`PROVIDERS`] with [`AuthScheme::Bearer`] rather than separate types.

use serde::Serialize;

use crate::error::DeliveryError;

/// How a provider authenticates and shapes its fee lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// API token plus store GUID, both mandatory (Noest).
    TokenGuid,
    /// `Authorization: Bearer <token>` (EcoTrack family).
    Bearer,
    /// Per-commune fee lookups with a `Token` authorization header (Maystro).
    Maystro,
}

impl AuthScheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AuthScheme::TokenGuid => "token_guid",
            AuthScheme::Bearer => "bearer",
            AuthScheme::Maystro => "maystro",
        }
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderSpec {
    pub id: &'static str,
    pub display_name: &'static str,
    pub base_url: &'static str,
    pub scheme: AuthScheme,
}

const fn bearer(id: &'static str, display_name: &'static str, base_url: &'static str) -> ProviderSpec {
    ProviderSpec {
        id,
        display_name,
        base_url,
        scheme: AuthScheme::Bearer,
    }
}

pub const PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        id: "noest",
        display_name: "Noest Express",
        base_url: "https://app.noest-dz.com",
        scheme: AuthScheme::TokenGuid,
    },
    ProviderSpec {
        id: "maystro",
        display_name: "Maystro Delivery",
        base_url: "https://backend.maystro-delivery.com",
        scheme: AuthScheme::Maystro,
    },
    bearer("ecotrack", "EcoTrack", "https://app.ecotrack.dz"),
    bearer("anderson", "Anderson Delivery", "https://anderson.ecotrack.dz"),
    bearer("areex", "Areex", "https://areex.ecotrack.dz"),
    bearer("ba_consult", "BA Consult", "https://bacexpress.ecotrack.dz"),
    bearer("conexlog", "Conexlog", "https://app.conexlog-dz.com"),
    bearer("coyote_express", "Coyote Express", "https://coyoteexpressdz.ecotrack.dz"),
    bearer("dhd", "DHD", "https://dhd.ecotrack.dz"),
    bearer("distazero", "Distazero", "https://distazero.ecotrack.dz"),
    bearer("e48hr_livraison", "48Hr Livraison", "https://48hr.ecotrack.dz"),
    bearer("fretdirect", "FRET.Direct", "https://fret.ecotrack.dz"),
    bearer("golivri", "GOLIVRI", "https://golivri.ecotrack.dz"),
    bearer("mono_hub", "Mono Hub", "https://mono.ecotrack.dz"),
    bearer("msm_go", "MSM Go", "https://msmgo.ecotrack.dz"),
    bearer("negmar_express", "Negmar Express", "https://negmar.ecotrack.dz"),
    bearer("packers", "Packers", "https://packers.ecotrack.dz"),
    bearer("prest", "Prest", "https://prest.ecotrack.dz"),
    bearer("rb_livraison", "RB Livraison", "https://rblivraison.ecotrack.dz"),
    bearer("rex_livraison", "Rex Livraison", "https://rex.ecotrack.dz"),
    bearer("rocket_delivery", "Rocket Delivery", "https://rocket.ecotrack.dz"),
    bearer("salva_delivery", "Salva Delivery", "https://salvadelivery.ecotrack.dz"),
    bearer("speed_delivery", "Speed Delivery", "https://speeddelivery.ecotrack.dz"),
    bearer("tsl_express", "TSL Express", "https://tsl.ecotrack.dz"),
    bearer("worldexpress", "WorldExpress", "https://worldexpress.ecotrack.dz"),
];

/// Resolves a provider id (case-insensitive, surrounding whitespace ignored).
///
/// # Errors
///
/// Returns [`DeliveryError::UnsupportedProvider`] for ids not in [`PROVIDERS`].
pub fn resolve_provider(id: &str) -> Result<&'static ProviderSpec, DeliveryError> {
    let wanted = id.trim();
    PROVIDERS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| DeliveryError::UnsupportedProvider(wanted.to_owned()))
}

#[must_use]
pub fn supported_providers() -> &'static [ProviderSpec] {
    PROVIDERS
}
