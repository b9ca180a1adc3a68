//! Provider listing and rate import commands.

use easycod_core::{ConfigError, ProviderCredential};
use easycod_delivery::{supported_providers, ImportOutcome, RateClient, RateClientConfig};

use crate::ImportArgs;

pub(crate) fn print_providers() {
    println!("{:<18} {:<20} {:<10} BASE URL", "ID", "NAME", "AUTH");
    for spec in supported_providers() {
        println!(
            "{:<18} {:<20} {:<10} {}",
            spec.id, spec.display_name, spec.scheme, spec.base_url
        );
    }
}

/// Client settings for an import. `DATABASE_URL` is only needed when saving,
/// so a missing required variable falls back to the defaults here.
fn rate_client_config() -> anyhow::Result<RateClientConfig> {
    match easycod_core::load_app_config_from_env() {
        Ok(config) => Ok(RateClientConfig::from_app_config(&config)),
        Err(ConfigError::MissingEnvVar(var)) => {
            tracing::debug!(var = %var, "app config incomplete; using default delivery client settings");
            Ok(RateClientConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn credential_from_args(args: &ImportArgs) -> ProviderCredential {
    let mut credential = ProviderCredential::new(
        args.provider.trim().to_ascii_lowercase(),
        args.token.trim(),
    );
    if let Some(guid) = args.guid.as_deref().filter(|g| !g.trim().is_empty()) {
        credential = credential.with_guid(guid.trim());
    }
    if let Some(url) = args.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        credential = credential.with_api_url(url.trim());
    }
    credential
}

/// Import rates from a provider and print them.
///
/// With `--save`, the result replaces the shop's manual fallback rates; the
/// database is only opened after a successful import.
///
/// # Errors
///
/// Returns an error if the import fails, or if saving was requested and the
/// database cannot be reached.
pub(crate) async fn run_import(args: ImportArgs) -> anyhow::Result<()> {
    let credential = credential_from_args(&args);
    let client = RateClient::new(rate_client_config()?)
        .map_err(|e| anyhow::anyhow!("failed to build delivery client: {e}"))?;

    let outcome = client.import_rates(&credential).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    if outcome.is_partial() {
        eprintln!(
            "warning: {} region(s) failed: {:?}",
            outcome.failed_regions.len(),
            outcome.failed_regions
        );
    }

    if args.save {
        let Some(shop) = args.shop.as_deref() else {
            anyhow::bail!("--save requires --shop");
        };
        save_outcome(shop, &outcome).await?;
        println!("saved {} rate(s) for {shop}", outcome.rates.len());
    }

    Ok(())
}

async fn save_outcome(shop: &str, outcome: &ImportOutcome) -> anyhow::Result<()> {
    let config = easycod_core::load_app_config_from_env()?;
    let pool = easycod_db::connect_pool(
        &config.database_url,
        easycod_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    let saved = easycod_db::save_manual_rates(&pool, shop, &outcome.rates).await;
    easycod_db::close_pool(&pool).await;
    saved?;
    Ok(())
}

fn print_outcome(outcome: &ImportOutcome) {
    println!(
        "{} rate(s) from {}",
        outcome.rates.len(),
        outcome.provider
    );
    println!("{:>4}  {:<24} {:>10} {:>10}", "ID", "REGION", "HOME", "STOP DESK");
    for rate in &outcome.rates {
        let stop_desk = if rate.supports_stop_desk() {
            format!("{:.2}", rate.stop_desk_fee)
        } else {
            "-".to_string()
        };
        println!(
            "{:>4}  {:<24} {:>10.2} {:>10}",
            rate.region_id, rate.region_name_ascii, rate.home_delivery_fee, stop_desk
        );
    }
}
