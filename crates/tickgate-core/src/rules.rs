//! The closed set of validation rules.
//!
//! Rules are pure functions of `(tick, optional context)` tagged with a
//! severity tier. The engine runs every rule on every call; a violation is
//! returned data, never an error path, so one bad field cannot stop the
//! remaining rules from reporting.

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::context::SymbolContext;
use crate::decimal::Decimal;
use crate::domain::{Quality, RawTick, Symbol, UtcDateTime};

/// Hard violations force rejection; soft violations flag the record as
/// suspect unless a hard violation is also present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Hard,
    Soft,
}

/// Clock-skew tolerance before a timestamp counts as "from the future".
pub const FUTURE_TOLERANCE_MS: i128 = 5_000;

/// Upper bound on any plausible price.
pub const PRICE_CEILING: i64 = 1_000_000;

/// One validation rule. A closed enum rather than trait objects: the rule
/// set is fixed, and each variant stays independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    ValidSymbol,
    PositivePrice,
    PriceCeiling,
    ValidTimestamp,
    NoFutureTimestamp,
    Staleness,
    SequenceGap,
    PriceInertia,
}

impl Rule {
    /// Fixed evaluation order. The verdict depends only on aggregated
    /// severities, but this order fixes the diagnostic ordering of the
    /// returned violation list.
    pub const ALL: [Self; 8] = [
        Self::ValidSymbol,
        Self::PositivePrice,
        Self::PriceCeiling,
        Self::ValidTimestamp,
        Self::NoFutureTimestamp,
        Self::Staleness,
        Self::SequenceGap,
        Self::PriceInertia,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ValidSymbol => "valid_symbol",
            Self::PositivePrice => "positive_price",
            Self::PriceCeiling => "price_ceiling",
            Self::ValidTimestamp => "valid_timestamp",
            Self::NoFutureTimestamp => "no_future_timestamp",
            Self::Staleness => "staleness",
            Self::SequenceGap => "sequence_gap",
            Self::PriceInertia => "price_inertia",
        }
    }

    pub const fn severity(&self) -> Severity {
        match self {
            Self::ValidSymbol
            | Self::PositivePrice
            | Self::PriceCeiling
            | Self::ValidTimestamp
            | Self::NoFutureTimestamp => Severity::Hard,
            Self::Staleness | Self::SequenceGap | Self::PriceInertia => Severity::Soft,
        }
    }

    /// Evaluate this rule against a tick and its context snapshot.
    pub fn evaluate(
        &self,
        tick: &RawTick,
        context: Option<&SymbolContext>,
        now: UtcDateTime,
        config: &PipelineConfig,
    ) -> Option<RuleViolation> {
        match self {
            Self::ValidSymbol => self.check_symbol(tick),
            Self::PositivePrice => self.check_positive_price(tick),
            Self::PriceCeiling => self.check_price_ceiling(tick),
            Self::ValidTimestamp => self.check_timestamp(tick),
            Self::NoFutureTimestamp => self.check_future_timestamp(tick, now),
            Self::Staleness => self.check_staleness(tick, now, config),
            Self::SequenceGap => self.check_sequence_gap(tick, context),
            Self::PriceInertia => self.check_price_inertia(tick, context, config),
        }
    }

    fn check_symbol(&self, tick: &RawTick) -> Option<RuleViolation> {
        let err = Symbol::parse(&tick.symbol).err()?;
        Some(
            self.violation(err.to_string())
                .field("symbol")
                .actual(&tick.symbol),
        )
    }

    fn check_positive_price(&self, tick: &RawTick) -> Option<RuleViolation> {
        match Decimal::parse(&tick.price) {
            Err(err) => Some(self.violation(err.to_string()).field("price").actual(&tick.price)),
            Ok(price) if !price.is_positive() => Some(
                self.violation(format!("price {price} must be strictly positive"))
                    .field("price")
                    .expected("> 0")
                    .actual(&tick.price),
            ),
            Ok(_) => None,
        }
    }

    fn check_price_ceiling(&self, tick: &RawTick) -> Option<RuleViolation> {
        // An unparsable price is "not applicable" here, not a pass:
        // positive_price already reported it, and repeating the parse
        // failure under a second rule would only add noise.
        let price = Decimal::parse(&tick.price).ok()?;
        if price > Decimal::from_i64(PRICE_CEILING) {
            return Some(
                self.violation(format!("price {price} exceeds ceiling {PRICE_CEILING}"))
                    .field("price")
                    .expected(format!("<= {PRICE_CEILING}"))
                    .actual(&tick.price),
            );
        }
        None
    }

    fn check_timestamp(&self, tick: &RawTick) -> Option<RuleViolation> {
        let err = UtcDateTime::parse(&tick.timestamp).err()?;
        Some(
            self.violation(err.to_string())
                .field("timestamp")
                .actual(&tick.timestamp),
        )
    }

    fn check_future_timestamp(&self, tick: &RawTick, now: UtcDateTime) -> Option<RuleViolation> {
        let ts = UtcDateTime::parse(&tick.timestamp).ok()?;
        let ahead_ms = (ts - now).whole_milliseconds();
        if ahead_ms > FUTURE_TOLERANCE_MS {
            return Some(
                self.violation(format!(
                    "timestamp is {ahead_ms}ms in the future (tolerance {FUTURE_TOLERANCE_MS}ms)"
                ))
                .field("timestamp")
                .expected(format!("<= now + {FUTURE_TOLERANCE_MS}ms"))
                .actual(&tick.timestamp),
            );
        }
        None
    }

    fn check_staleness(
        &self,
        tick: &RawTick,
        now: UtcDateTime,
        config: &PipelineConfig,
    ) -> Option<RuleViolation> {
        let ts = UtcDateTime::parse(&tick.timestamp).ok()?;
        let age_ms = (now - ts).whole_milliseconds();
        let threshold = i128::from(config.staleness_threshold_ms);
        if age_ms > threshold {
            return Some(
                self.violation(format!("tick is {age_ms}ms old (threshold {threshold}ms)"))
                    .field("timestamp")
                    .expected(format!("age <= {threshold}ms"))
                    .actual(&tick.timestamp),
            );
        }
        None
    }

    fn check_sequence_gap(
        &self,
        tick: &RawTick,
        context: Option<&SymbolContext>,
    ) -> Option<RuleViolation> {
        let last = context?.last_sequence_id()?;
        let seq = tick.sequence_id?;
        // Repeats and backward ids pass through; only forward gaps are
        // flagged.
        if seq > last.saturating_add(1) {
            return Some(
                self.violation(format!("sequence jumped from {last} to {seq}"))
                    .field("sequence_id")
                    .expected((last.saturating_add(1)).to_string())
                    .actual(seq.to_string()),
            );
        }
        None
    }

    fn check_price_inertia(
        &self,
        tick: &RawTick,
        context: Option<&SymbolContext>,
        config: &PipelineConfig,
    ) -> Option<RuleViolation> {
        let context = context?;
        let price = Decimal::parse(&tick.price).ok()?;
        let last = context.last_price();
        let change = (price - last).abs().ratio(&last)?;
        if change > config.price_change_threshold {
            return Some(
                self.violation(format!(
                    "price moved {:.2}% against last accepted {last}",
                    change * 100.0
                ))
                .field("price")
                .expected(format!(
                    "move <= {:.2}%",
                    config.price_change_threshold * 100.0
                ))
                .actual(&tick.price),
            );
        }
        None
    }

    fn violation(&self, message: String) -> RuleViolation {
        RuleViolation {
            rule: *self,
            severity: self.severity(),
            message,
            field: None,
            expected: None,
            actual: None,
        }
    }
}

/// One rule violation with diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: Rule,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl RuleViolation {
    fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_owned());
        self
    }

    fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

/// Derive the verdict from the aggregated severities.
pub fn classify(violations: &[RuleViolation]) -> Quality {
    if violations.iter().any(|v| v.severity == Severity::Hard) {
        Quality::Rejected
    } else if violations.is_empty() {
        Quality::Verified
    } else {
        Quality::Suspect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextStore;
    use crate::domain::ValidatedTick;

    fn raw(symbol: &str, price: &str, timestamp: String) -> RawTick {
        RawTick {
            symbol: symbol.to_owned(),
            price: price.to_owned(),
            volume: 100,
            timestamp,
            exchange: None,
            sequence_id: None,
            bid: None,
            ask: None,
            bid_size: None,
            ask_size: None,
        }
    }

    fn now_rfc3339() -> String {
        UtcDateTime::now().format_rfc3339()
    }

    fn context_with(symbol: &str, price: &str, seq: Option<u64>) -> SymbolContext {
        let store = ContextStore::new();
        store.fold(&ValidatedTick {
            symbol: Symbol::parse(symbol).expect("must parse"),
            price: Decimal::parse(price).expect("must parse"),
            volume: 100,
            timestamp: UtcDateTime::now(),
            venue: None,
            sequence_id: seq,
        });
        store.get(symbol).expect("context must exist")
    }

    #[test]
    fn severities_match_the_rule_tiers() {
        assert_eq!(Rule::PositivePrice.severity(), Severity::Hard);
        assert_eq!(Rule::PriceCeiling.severity(), Severity::Hard);
        assert_eq!(Rule::ValidTimestamp.severity(), Severity::Hard);
        assert_eq!(Rule::NoFutureTimestamp.severity(), Severity::Hard);
        assert_eq!(Rule::Staleness.severity(), Severity::Soft);
        assert_eq!(Rule::SequenceGap.severity(), Severity::Soft);
        assert_eq!(Rule::PriceInertia.severity(), Severity::Soft);
    }

    #[test]
    fn positive_price_reports_unparsable_and_non_positive() {
        let config = PipelineConfig::default();
        let now = UtcDateTime::now();

        for price in ["abc", "0", "-5.00"] {
            let tick = raw("AAPL", price, now_rfc3339());
            let violation = Rule::PositivePrice
                .evaluate(&tick, None, now, &config)
                .expect("must fire");
            assert_eq!(violation.rule, Rule::PositivePrice);
            assert_eq!(violation.field.as_deref(), Some("price"));
        }

        let tick = raw("AAPL", "150.25", now_rfc3339());
        assert!(Rule::PositivePrice.evaluate(&tick, None, now, &config).is_none());
    }

    #[test]
    fn price_ceiling_fires_only_above_one_million() {
        let config = PipelineConfig::default();
        let now = UtcDateTime::now();

        let tick = raw("AAPL", "1000000.01", now_rfc3339());
        assert!(Rule::PriceCeiling.evaluate(&tick, None, now, &config).is_some());

        let tick = raw("AAPL", "1000000", now_rfc3339());
        assert!(Rule::PriceCeiling.evaluate(&tick, None, now, &config).is_none());
    }

    #[test]
    fn price_ceiling_is_not_applicable_to_unparsable_price() {
        let config = PipelineConfig::default();
        let now = UtcDateTime::now();

        let tick = raw("AAPL", "not-a-price", now_rfc3339());
        assert!(Rule::PriceCeiling.evaluate(&tick, None, now, &config).is_none());
    }

    #[test]
    fn future_timestamp_respects_skew_tolerance() {
        let config = PipelineConfig::default();
        let now = UtcDateTime::now();

        let near = (now.into_inner() + time::Duration::seconds(3))
            .format(&time::format_description::well_known::Rfc3339)
            .expect("must format");
        let tick = raw("AAPL", "150.00", near);
        assert!(Rule::NoFutureTimestamp.evaluate(&tick, None, now, &config).is_none());

        let far = (now.into_inner() + time::Duration::milliseconds(60_001))
            .format(&time::format_description::well_known::Rfc3339)
            .expect("must format");
        let tick = raw("AAPL", "150.00", far);
        assert!(Rule::NoFutureTimestamp.evaluate(&tick, None, now, &config).is_some());
    }

    #[test]
    fn staleness_fires_past_configured_threshold() {
        let config = PipelineConfig::default();
        let now = UtcDateTime::now();

        let old = (now.into_inner() - time::Duration::minutes(5))
            .format(&time::format_description::well_known::Rfc3339)
            .expect("must format");
        let tick = raw("AAPL", "150.00", old);
        let violation = Rule::Staleness
            .evaluate(&tick, None, now, &config)
            .expect("must fire");
        assert_eq!(violation.severity, Severity::Soft);

        let fresh = raw("AAPL", "150.00", now_rfc3339());
        assert!(Rule::Staleness.evaluate(&fresh, None, now, &config).is_none());
    }

    #[test]
    fn sequence_gap_needs_both_sides_and_a_forward_jump() {
        let config = PipelineConfig::default();
        let now = UtcDateTime::now();
        let context = context_with("AAPL", "150.00", Some(5));

        let mut tick = raw("AAPL", "150.00", now_rfc3339());
        tick.sequence_id = Some(9);
        assert!(Rule::SequenceGap
            .evaluate(&tick, Some(&context), now, &config)
            .is_some());

        tick.sequence_id = Some(6);
        assert!(Rule::SequenceGap
            .evaluate(&tick, Some(&context), now, &config)
            .is_none());

        // Repeat and backward ids pass through.
        tick.sequence_id = Some(5);
        assert!(Rule::SequenceGap
            .evaluate(&tick, Some(&context), now, &config)
            .is_none());
        tick.sequence_id = Some(2);
        assert!(Rule::SequenceGap
            .evaluate(&tick, Some(&context), now, &config)
            .is_none());

        // Either side missing a sequence id.
        tick.sequence_id = None;
        assert!(Rule::SequenceGap
            .evaluate(&tick, Some(&context), now, &config)
            .is_none());
        tick.sequence_id = Some(9);
        let no_seq_context = context_with("AAPL", "150.00", None);
        assert!(Rule::SequenceGap
            .evaluate(&tick, Some(&no_seq_context), now, &config)
            .is_none());
        assert!(Rule::SequenceGap.evaluate(&tick, None, now, &config).is_none());
    }

    #[test]
    fn price_inertia_flags_large_moves_only_with_context() {
        let config = PipelineConfig::default();
        let now = UtcDateTime::now();
        let context = context_with("AAPL", "105.00", None);

        // ~14.3% move against 105.00 with a 10% threshold.
        let tick = raw("AAPL", "120.00", now_rfc3339());
        let violation = Rule::PriceInertia
            .evaluate(&tick, Some(&context), now, &config)
            .expect("must fire");
        assert_eq!(violation.severity, Severity::Soft);

        // 5% move stays under the threshold.
        let context = context_with("AAPL", "100.00", None);
        let tick = raw("AAPL", "105.00", now_rfc3339());
        assert!(Rule::PriceInertia
            .evaluate(&tick, Some(&context), now, &config)
            .is_none());

        // First sighting has no context to compare against.
        assert!(Rule::PriceInertia.evaluate(&tick, None, now, &config).is_none());
    }

    #[test]
    fn classify_maps_severities_to_verdicts() {
        assert_eq!(classify(&[]), Quality::Verified);

        let soft = Rule::Staleness.violation("old".to_owned());
        assert_eq!(classify(&[soft.clone()]), Quality::Suspect);

        let hard = Rule::PositivePrice.violation("bad".to_owned());
        assert_eq!(classify(&[soft, hard]), Quality::Rejected);
    }
}
