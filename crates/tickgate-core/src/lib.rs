//! Core validation engine for tickgate.
//!
//! This crate contains:
//! - Exact decimal arithmetic for monetary values
//! - Canonical tick domain models and validation newtypes
//! - The closed, severity-tagged rule set
//! - Per-symbol rolling context for anomaly detection
//! - The tiered validation engine and its dead-letter sink

pub mod config;
pub mod context;
pub mod dead_letter;
pub mod decimal;
pub mod domain;
pub mod engine;
pub mod error;
pub mod rules;

pub use config::{Environment, PipelineConfig, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
pub use context::{ContextStore, SymbolContext, HISTORY_CAPACITY};
pub use dead_letter::{DeadLetterRecord, DeadLetterSink, CAPTURE_SOURCE};
pub use decimal::Decimal;
pub use domain::{Quality, RawTick, Symbol, UtcDateTime, ValidatedTick, Venue};
pub use engine::{BatchOutcome, BatchReport, Engine, Outcome};
pub use error::{ConfigError, FormatError};
pub use rules::{classify, Rule, RuleViolation, Severity, FUTURE_TOLERANCE_MS, PRICE_CEILING};
