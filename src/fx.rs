// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spot-rate conversion against the public rate API.
//!
//! Every conversion between different currencies fetches a fresh rate table. Nothing is
//! cached and nothing is retried.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::error::FxError;
use crate::utils::http_client;

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest";
pub const DEFAULT_CURRENCIES_URL: &str = "https://openexchangerates.org/api/currencies.json";

/// Source of the latest rate table for a base currency (`1 base = rate quote`).
pub trait RateSource {
    fn latest(&self, base: &str) -> Result<HashMap<String, f64>, FxError>;
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

pub struct HttpRateSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(base_url: &str) -> Result<Self, FxError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl RateSource for HttpRateSource {
    fn latest(&self, base: &str) -> Result<HashMap<String, f64>, FxError> {
        let url = format!("{}/{}", self.base_url, base);
        debug!(%url, "fetching rate table");
        let resp = self.client.get(&url).send()?.error_for_status()?;
        let body = resp.text()?;
        let parsed: LatestRates = serde_json::from_str(&body).map_err(|e| FxError::Decode {
            base: base.to_string(),
            reason: e.to_string(),
        })?;
        Ok(parsed.rates)
    }
}

/// Converts `amount` from `from` into `to` at the current spot rate.
///
/// Equal codes return the amount untouched without touching the network. The result is
/// not rounded; callers round at the point of write.
pub fn convert(
    source: &dyn RateSource,
    amount: Decimal,
    from: &str,
    to: &str,
) -> Result<Decimal, FxError> {
    if amount <= Decimal::ZERO {
        return Err(FxError::NonPositiveAmount(amount));
    }
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();
    if from == to {
        return Ok(amount);
    }
    let rate = rate(source, &from, &to)?;
    let converted = amount
        .checked_mul(rate)
        .ok_or(FxError::Overflow { amount, rate })?;
    debug!(%amount, %from, %to, %rate, %converted, "converted amount");
    Ok(converted)
}

/// Looks up the `from -> to` spot rate.
pub fn rate(source: &dyn RateSource, from: &str, to: &str) -> Result<Decimal, FxError> {
    let table = source.latest(from)?;
    let raw = table.get(to).copied().ok_or_else(|| FxError::MissingRate {
        base: from.to_string(),
        quote: to.to_string(),
    })?;
    Decimal::try_from(raw).map_err(|e| FxError::Decode {
        base: from.to_string(),
        reason: format!("rate {} for {}: {}", raw, to, e),
    })
}

/// Downloads the currency code to display name map.
pub fn fetch_currency_names(url: &str) -> Result<HashMap<String, String>, FxError> {
    let client = http_client()?;
    debug!(%url, "fetching currency names");
    let resp = client.get(url).send()?.error_for_status()?;
    let body = resp.text()?;
    serde_json::from_str(&body).map_err(|e| FxError::Decode {
        base: "currencies".to_string(),
        reason: e.to_string(),
    })
}
