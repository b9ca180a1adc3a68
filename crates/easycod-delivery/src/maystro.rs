//! Maystro fee fan-out.
//!
//! Maystro prices per commune and per delivery type, so each region costs two
//! calls against its chef-lieu commune. Regions run concurrently; a region
//! whose pair fails is dropped and reported in the failed list. The batch
//! itself never fails on a region's account.

use easycod_core::{chef_lieu_commune, DeliveryRate, Region, REGIONS};
use futures::stream::{self, StreamExt};
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde_json::Value;

use crate::client::{endpoint, RateClient};
use crate::error::DeliveryError;
use crate::normalize::{build_rate, maystro_fee_value, parse_fee, HOME_FEE, STOP_DESK_FEE};

const FEES_PATH: &str = "api/stores/delivery_fees/";

/// Maystro's `delivery_type` query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryType {
    Home = 1,
    StopDesk = 2,
}

impl DeliveryType {
    fn query_value(self) -> &'static str {
        match self {
            DeliveryType::Home => "1",
            DeliveryType::StopDesk => "2",
        }
    }

    fn field(self) -> &'static str {
        match self {
            DeliveryType::Home => HOME_FEE,
            DeliveryType::StopDesk => STOP_DESK_FEE,
        }
    }
}

/// Fetches home and stop-desk fees for every region.
///
/// Returns the rates and the ids of regions that were dropped, both sorted by
/// region id. A rejected token therefore shows up as every region failed.
///
/// # Errors
///
/// Returns [`DeliveryError::Validation`] only if the endpoint URL cannot be built.
pub(crate) async fn fetch_rates(
    client: &RateClient,
    provider: &str,
    base_url: &Url,
    token: &str,
) -> Result<(Vec<DeliveryRate>, Vec<u16>), DeliveryError> {
    let url = endpoint(base_url, FEES_PATH)?;
    let concurrency = client.config().maystro_max_concurrent_regions.max(1);

    let results: Vec<(u16, Result<DeliveryRate, DeliveryError>)> =
        stream::iter(REGIONS.iter().copied())
            .map(|region| {
                let url = url.clone();
                async move {
                    let result = fetch_region(client, provider, &url, token, &region).await;
                    (u16::from(region.id), result)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

    let mut rates = Vec::with_capacity(results.len());
    let mut failed = Vec::new();

    for (region_id, result) in results {
        match result {
            Ok(rate) => rates.push(rate),
            Err(err) => {
                tracing::warn!(
                    provider,
                    region_id,
                    error = %err,
                    "region fee lookup failed; omitting region"
                );
                failed.push(region_id);
            }
        }
    }

    if rates.is_empty() && !failed.is_empty() {
        tracing::warn!(provider, "every region fee lookup failed");
    }

    rates.sort_by_key(|r| r.region_id);
    failed.sort_unstable();
    Ok((rates, failed))
}

async fn fetch_region(
    client: &RateClient,
    provider: &str,
    url: &Url,
    token: &str,
    region: &Region,
) -> Result<DeliveryRate, DeliveryError> {
    let region_id = u16::from(region.id);
    let commune = chef_lieu_commune(region_id).ok_or_else(|| {
        DeliveryError::Validation(format!("no commune mapped for region {region_id}"))
    })?;
    let (home, stop_desk) = tokio::try_join!(
        fetch_fee(client, provider, url, token, region, commune, DeliveryType::Home),
        fetch_fee(client, provider, url, token, region, commune, DeliveryType::StopDesk),
    )?;
    Ok(build_rate(region_id, home, stop_desk))
}

async fn fetch_fee(
    client: &RateClient,
    provider: &str,
    url: &Url,
    token: &str,
    region: &Region,
    commune: u32,
    delivery_type: DeliveryType,
) -> Result<f64, DeliveryError> {
    let builder = client
        .http()
        .get(url.clone())
        .query(&[
            ("commune", commune.to_string().as_str()),
            ("delivery_type", delivery_type.query_value()),
        ])
        .header(AUTHORIZATION, format!("Token {token}"));

    let body: Value = client.send_json(provider, builder).await?;
    parse_fee(
        maystro_fee_value(&body),
        client.config().fee_parsing,
        u16::from(region.id),
        delivery_type.field(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_type_query_values() {
        assert_eq!(DeliveryType::Home.query_value(), "1");
        assert_eq!(DeliveryType::StopDesk.query_value(), "2");
    }

    #[test]
    fn delivery_type_names_its_fee_field() {
        assert_eq!(DeliveryType::Home.field(), HOME_FEE);
        assert_eq!(DeliveryType::StopDesk.field(), STOP_DESK_FEE);
    }
}
