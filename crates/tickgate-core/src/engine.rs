//! The tiered validation engine.

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::context::{self, ContextStore, SymbolContext};
use crate::dead_letter::DeadLetterSink;
use crate::domain::{Quality, RawTick, UtcDateTime, ValidatedTick};
use crate::error::ConfigError;
use crate::rules::{classify, Rule, RuleViolation};

/// Result of one validate call: the normalized tick (absent when
/// rejected), the verdict, and the complete violation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub tick: Option<ValidatedTick>,
    pub quality: Quality,
    pub violations: Vec<RuleViolation>,
}

/// Per-verdict counts for a validated batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub verified: usize,
    pub suspect: usize,
    pub rejected: usize,
}

impl BatchReport {
    pub fn record(&mut self, quality: Quality) {
        self.total += 1;
        match quality {
            Quality::Verified => self.verified += 1,
            Quality::Suspect => self.suspect += 1,
            Quality::Rejected => self.rejected += 1,
        }
    }
}

/// Outcomes and summary for one batch, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub outcomes: Vec<Outcome>,
    pub report: BatchReport,
}

impl BatchOutcome {
    /// The normalized ticks that survived validation, in input order.
    pub fn accepted(&self) -> impl Iterator<Item = &ValidatedTick> {
        self.outcomes.iter().filter_map(|o| o.tick.as_ref())
    }
}

/// Classifies incoming ticks into quality tiers before they reach storage
/// or trading logic.
///
/// `validate` is synchronous and never fails: malformed input degrades to a
/// rejected verdict plus dead-letter capture, not an error.
#[derive(Debug)]
pub struct Engine {
    config: PipelineConfig,
    contexts: ContextStore,
    dead_letters: DeadLetterSink,
}

impl Engine {
    /// Build an engine from a fully populated config. Range violations are
    /// reported here, once, rather than at call time.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            contexts: ContextStore::new(),
            dead_letters: DeadLetterSink::new(),
        })
    }

    /// Run every rule against the tick and its context snapshot, derive the
    /// verdict, and either fold the tick into context or capture it to the
    /// dead-letter sink.
    ///
    /// The symbol's shard lock is held across the whole call, so calls for
    /// the same symbol serialize in arrival order while other symbols
    /// proceed in parallel.
    pub fn validate(&self, raw: &RawTick) -> Outcome {
        let key = context::normalize_key(&raw.symbol);
        let now = UtcDateTime::now();

        let mut shard = self
            .contexts
            .shard(&key)
            .write()
            .expect("context shard lock should not be poisoned");

        let context = shard.get(&key);
        let violations: Vec<RuleViolation> = Rule::ALL
            .iter()
            .filter_map(|rule| rule.evaluate(raw, context, now, &self.config))
            .collect();

        let quality = classify(&violations);
        if quality == Quality::Rejected {
            drop(shard);
            if self.config.enable_dead_letter_queue {
                self.dead_letters.capture(raw, &violations);
            }
            return Outcome {
                tick: None,
                quality,
                violations,
            };
        }

        let Ok(tick) = ValidatedTick::from_raw(raw) else {
            // The hard rules guarantee these fields parse; if they ever
            // diverge, reject rather than panic.
            return Outcome {
                tick: None,
                quality: Quality::Rejected,
                violations,
            };
        };

        tracing::debug!(symbol = %tick.symbol, quality = ?quality, "folding accepted tick");
        context::fold_locked(&mut shard, key, &tick);

        Outcome {
            tick: Some(tick),
            quality,
            violations,
        }
    }

    /// Validate a batch in input order and summarize the verdicts.
    pub fn validate_batch(&self, ticks: &[RawTick]) -> BatchOutcome {
        let mut report = BatchReport::default();
        let outcomes: Vec<Outcome> = ticks
            .iter()
            .map(|tick| {
                let outcome = self.validate(tick);
                report.record(outcome.quality);
                outcome
            })
            .collect();

        if report.rejected > 0 {
            tracing::warn!(
                rejected = report.rejected,
                total = report.total,
                "data quality alert: batch contained rejected records"
            );
        }

        BatchOutcome { outcomes, report }
    }

    /// Snapshot of one symbol's rolling context.
    pub fn context_for(&self, symbol: &str) -> Option<SymbolContext> {
        self.contexts.get(symbol)
    }

    /// Symbols with tracked context, for monitoring collaborators.
    pub fn tracked_symbols(&self) -> Vec<String> {
        self.contexts.symbols()
    }

    pub fn dead_letters(&self) -> &DeadLetterSink {
        &self.dead_letters
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
