//! Delivery-rate import from Algerian logistics providers.
//!
//! [`registry`] maps a provider id to its endpoint and auth scheme,
//! [`RateClient`] performs the provider calls, and [`normalize`] turns each
//! provider's payload into [`easycod_core::DeliveryRate`] records.

pub mod client;
pub mod error;
pub mod maystro;
pub mod normalize;
pub mod registry;
pub mod types;

pub use client::{validate_credential, ImportOutcome, RateClient, RateClientConfig};
pub use error::DeliveryError;
pub use registry::{resolve_provider, supported_providers, AuthScheme, ProviderSpec};
