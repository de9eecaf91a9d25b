// src/catalog/record.rs
// =============================================================================
// AssetRecord: one coin as returned by the CoinCap `assets/{id}` endpoint.
//
// The wire format looks like this:
//
//   {
//     "data": { "id": "bitcoin", "name": "Bitcoin", "symbol": "BTC",
//               "priceUsd": "64123.4567", ... },
//     "timestamp": 1718000000000
//   }
//
// CoinCap sends numbers as JSON strings ("priceUsd": "64123.45"), but we
// accept plain numbers too. The timestamp is epoch milliseconds.
// =============================================================================

use super::AssetId;
use crate::error::FetchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A successfully fetched asset. Never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: AssetId,
    pub name: String,
    pub symbol: String,
    pub price_usd: f64,
    pub timestamp: DateTime<Utc>,
}

// Private wire types - only used while decoding a response body
#[derive(Deserialize)]
struct Envelope {
    data: Payload,
    timestamp: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    id: String,
    name: String,
    symbol: String,
    price_usd: Price,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    fn to_f64(&self) -> Result<f64, FetchError> {
        let value = match self {
            Price::Number(n) => *n,
            Price::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| FetchError::Parse(format!("invalid priceUsd: {s:?}")))?,
        };
        if !value.is_finite() {
            return Err(FetchError::Parse(format!("non-finite priceUsd: {value}")));
        }
        Ok(value)
    }
}

impl AssetRecord {
    /// Decodes a CoinCap response body into a record.
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        let price_usd = envelope.data.price_usd.to_f64()?;
        let timestamp = DateTime::from_timestamp_millis(envelope.timestamp).ok_or_else(|| {
            FetchError::Parse(format!("timestamp out of range: {}", envelope.timestamp))
        })?;

        Ok(AssetRecord {
            id: AssetId::new(envelope.data.id),
            name: envelope.data.name,
            symbol: envelope.data.symbol,
            price_usd,
            timestamp,
        })
    }
}
