//! Normalization of provider fee payloads into [`DeliveryRate`] records.

use easycod_core::{region_names, DeliveryRate, FeeParsing};
use serde_json::Value;

use crate::error::DeliveryError;
use crate::types::RawFeeEntry;

pub(crate) const HOME_FEE: &str = "home delivery fee";
pub(crate) const STOP_DESK_FEE: &str = "stop-desk fee";

/// Keys a Maystro fee object may carry its amount under, in lookup order.
const MAYSTRO_FEE_KEYS: [&str; 4] = ["price", "delivery_price", "fee", "tarif"];

/// Normalizes `(key, entry)` pairs in the order given.
///
/// The region id comes from `wilaya_id`, falling back to the object key.
/// Entries with neither are skipped with a warning; entries whose id is not
/// in the region table are kept under a `Wilaya {id}` placeholder name.
///
/// # Errors
///
/// Returns [`DeliveryError::InvalidFee`] under [`FeeParsing::Strict`] when a
/// fee is present but not a non-negative number.
pub fn normalize_fee_entries(
    entries: Vec<(Option<String>, RawFeeEntry)>,
    mode: FeeParsing,
) -> Result<Vec<DeliveryRate>, DeliveryError> {
    let mut rates = Vec::with_capacity(entries.len());

    for (key, entry) in entries {
        let Some(region_id) = parse_region_id(entry.wilaya_id.as_ref(), key.as_deref()) else {
            tracing::warn!(
                key = ?key,
                wilaya_id = ?entry.wilaya_id,
                "skipping fee entry without a usable region id"
            );
            continue;
        };

        let home = parse_fee(entry.tarif.as_ref(), mode, region_id, HOME_FEE)?;
        let stop_desk = parse_fee(entry.tarif_stopdesk.as_ref(), mode, region_id, STOP_DESK_FEE)?;
        rates.push(build_rate(region_id, home, stop_desk));
    }

    Ok(rates)
}

/// Builds a rate record, resolving display names from the region table.
#[must_use]
pub fn build_rate(region_id: u16, home_delivery_fee: f64, stop_desk_fee: f64) -> DeliveryRate {
    let (region_name_local, region_name_ascii) = region_names(region_id);
    DeliveryRate {
        region_id,
        region_name_local,
        region_name_ascii,
        home_delivery_fee,
        stop_desk_fee,
    }
}

/// Reads a region id from a JSON number or numeric string, else from `key`.
#[must_use]
pub fn parse_region_id(value: Option<&Value>, key: Option<&str>) -> Option<u16> {
    let from_value = match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<u16>().ok(),
        _ => None,
    };
    from_value.or_else(|| key.and_then(|k| k.trim().parse::<u16>().ok()))
}

/// Reads a fee from a JSON number or numeric string.
///
/// Absent, `null` and blank values are `0` in both modes. Anything else that
/// is not a finite, non-negative number is `0` under [`FeeParsing::Lenient`]
/// and an error under [`FeeParsing::Strict`].
///
/// # Errors
///
/// Returns [`DeliveryError::InvalidFee`] under strict parsing.
pub fn parse_fee(
    value: Option<&Value>,
    mode: FeeParsing,
    region_id: u16,
    field: &'static str,
) -> Result<f64, DeliveryError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(fee) if fee.is_finite() && fee >= 0.0 => Ok(fee),
        _ => match mode {
            FeeParsing::Lenient => {
                tracing::debug!(region_id, field, raw = ?value, "unreadable fee coerced to 0");
                Ok(0.0)
            }
            FeeParsing::Strict => Err(DeliveryError::InvalidFee {
                region_id,
                field,
                raw: value.map_or_else(String::new, Value::to_string),
            }),
        },
    }
}

/// Pulls the fee amount out of a Maystro fee body: a bare number or string,
/// or an object carrying the amount under one of [`MAYSTRO_FEE_KEYS`].
#[must_use]
pub fn maystro_fee_value(body: &Value) -> Option<&Value> {
    match body {
        Value::Number(_) | Value::String(_) => Some(body),
        Value::Object(map) => MAYSTRO_FEE_KEYS.iter().find_map(|k| map.get(*k)),
        _ => None,
    }
}
