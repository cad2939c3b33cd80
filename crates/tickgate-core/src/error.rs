use thiserror::Error;

/// Field-level parse failures on untrusted tick input.
///
/// These are never raised across the engine boundary: the engine folds them
/// into hard rule violations so the remaining rules still execute.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("price is not a valid decimal: '{value}'")]
    InvalidPrice { value: String },
    #[error("price '{value}' exceeds {max_digits} significant digits")]
    PriceTooManyDigits { value: String, max_digits: usize },
    #[error("price '{value}' carries more than {max_scale} fractional digits")]
    PriceScaleTooLarge { value: String, max_scale: u32 },

    #[error("timestamp must be RFC3339 with an offset: '{value}'")]
    InvalidTimestamp { value: String },

    #[error("unknown venue code '{value}'")]
    UnknownVenue { value: String },
}

/// Configuration range violations reported at engine construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("batch_size {value} must be between {min} and {max}")]
    BatchSizeOutOfRange {
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("{field} {value} must be between 0.0 and 1.0")]
    UnitIntervalOutOfRange { field: &'static str, value: f64 },
}
