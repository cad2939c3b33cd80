use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
use crate::domain::{Symbol, UtcDateTime, Venue};
use crate::error::FormatError;

/// Untrusted tick record as it arrives from ingestion.
///
/// Every field may be structurally malformed; nothing here is validated
/// until the record passes through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTick {
    pub symbol: String,
    pub price: String,
    #[serde(default)]
    pub volume: u64,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_size: Option<u64>,
}

/// Normalized tick produced for every non-rejected verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedTick {
    pub symbol: Symbol,
    pub price: Decimal,
    pub volume: u64,
    pub timestamp: UtcDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<u64>,
}

impl ValidatedTick {
    /// Normalize a raw tick. Callers are expected to have cleared the hard
    /// rules first; any remaining parse failure surfaces as an error.
    ///
    /// An exchange code outside the recognized venue set is passed through
    /// as `None` rather than failing the whole record.
    pub fn from_raw(raw: &RawTick) -> Result<Self, FormatError> {
        let venue = raw
            .exchange
            .as_deref()
            .and_then(|code| Venue::parse(code).ok());

        Ok(Self {
            symbol: Symbol::parse(&raw.symbol)?,
            price: Decimal::parse(&raw.price)?,
            volume: raw.volume,
            timestamp: UtcDateTime::parse(&raw.timestamp)?,
            venue,
            sequence_id: raw.sequence_id,
        })
    }
}

/// Quality verdict for a single validate call. Derived purely from the
/// severities of the collected violations; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Verified,
    Suspect,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(symbol: &str, price: &str, timestamp: &str) -> RawTick {
        RawTick {
            symbol: symbol.to_owned(),
            price: price.to_owned(),
            volume: 100,
            timestamp: timestamp.to_owned(),
            exchange: None,
            sequence_id: None,
            bid: None,
            ask: None,
            bid_size: None,
            ask_size: None,
        }
    }

    #[test]
    fn normalizes_symbol_price_and_timestamp() {
        let tick = ValidatedTick::from_raw(&raw("aapl", "150.25", "2026-02-20T15:30:00+01:00"))
            .expect("must normalize");

        assert_eq!(tick.symbol.as_str(), "AAPL");
        assert_eq!(tick.price.to_string(), "150.25");
        assert_eq!(tick.timestamp.format_rfc3339(), "2026-02-20T14:30:00Z");
    }

    #[test]
    fn unknown_exchange_code_passes_through_unset() {
        let mut input = raw("AAPL", "150.25", "2026-02-20T15:30:00Z");
        input.exchange = Some("LSE".to_owned());

        let tick = ValidatedTick::from_raw(&input).expect("must normalize");
        assert_eq!(tick.venue, None);
    }

    #[test]
    fn known_exchange_code_resolves() {
        let mut input = raw("AAPL", "150.25", "2026-02-20T15:30:00Z");
        input.exchange = Some("nsdq".to_owned());

        let tick = ValidatedTick::from_raw(&input).expect("must normalize");
        assert_eq!(tick.venue, Some(Venue::Nsdq));
    }

    #[test]
    fn raw_tick_deserializes_with_optional_fields_absent() {
        let tick: RawTick = serde_json::from_str(
            r#"{"symbol":"MSFT","price":"310.50","volume":200,"timestamp":"2026-02-20T15:30:02Z"}"#,
        )
        .expect("must deserialize");

        assert_eq!(tick.symbol, "MSFT");
        assert_eq!(tick.sequence_id, None);
        assert_eq!(tick.exchange, None);
    }
}
