//! Append-only capture of rejected records.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{RawTick, UtcDateTime};
use crate::rules::RuleViolation;

/// Source tag stamped on every record this engine captures.
pub const CAPTURE_SOURCE: &str = "validation-engine";

/// A rejected record preserved for audit and external replay.
///
/// Immutable once created except for the retry bookkeeping fields, which an
/// external replay component owns; this core only initializes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetterRecord {
    pub id: Uuid,
    pub original: RawTick,
    pub violations: Vec<RuleViolation>,
    pub captured_at: UtcDateTime,
    pub source: String,
    pub retry_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_retry_at: Option<UtcDateTime>,
}

/// Concurrency-safe append target for rejected records.
///
/// No dedup and no size bound: an external collaborator watches `drain`
/// output and decides when to persist or `clear`.
#[derive(Debug, Default)]
pub struct DeadLetterSink {
    records: Mutex<Vec<DeadLetterRecord>>,
}

impl DeadLetterSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the original raw record with the violations that rejected it.
    pub fn capture(&self, original: &RawTick, violations: &[RuleViolation]) {
        let record = DeadLetterRecord {
            id: Uuid::new_v4(),
            original: original.clone(),
            violations: violations.to_vec(),
            captured_at: UtcDateTime::now(),
            source: CAPTURE_SOURCE.to_owned(),
            retry_count: 0,
            last_retry_at: None,
        };

        tracing::warn!(
            symbol = %original.symbol,
            violations = record.violations.len(),
            record_id = %record.id,
            "captured rejected tick"
        );

        let mut records = self
            .records
            .lock()
            .expect("dead letter sink lock should not be poisoned");
        records.push(record);
    }

    /// Snapshot of all held records. Does not clear.
    pub fn drain(&self) -> Vec<DeadLetterRecord> {
        self.records
            .lock()
            .expect("dead letter sink lock should not be poisoned")
            .clone()
    }

    /// Discard every held record.
    pub fn clear(&self) {
        self.records
            .lock()
            .expect("dead letter sink lock should not be poisoned")
            .clear();
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .expect("dead letter sink lock should not be poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
