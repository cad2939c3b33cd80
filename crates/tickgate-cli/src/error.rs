use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] tickgate_core::ConfigError),

    #[error("line {line}: record is not a valid tick: {source}")]
    MalformedRecord {
        line: usize,
        source: serde_json::Error,
    },

    #[error("strict mode failed: {rejected} record(s) rejected")]
    StrictModeViolation { rejected: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::MalformedRecord { .. } | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
