use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Closed set of recognized trading venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Venue {
    Nyse,
    Nsdq,
    Arca,
    Bats,
    Iex,
    Otc,
}

impl Venue {
    pub const ALL: [Self; 6] = [
        Self::Nyse,
        Self::Nsdq,
        Self::Arca,
        Self::Bats,
        Self::Iex,
        Self::Otc,
    ];

    /// Parse a venue code, case-insensitively.
    pub fn parse(input: &str) -> Result<Self, FormatError> {
        match input.trim().to_ascii_uppercase().as_str() {
            "NYSE" => Ok(Self::Nyse),
            "NSDQ" => Ok(Self::Nsdq),
            "ARCA" => Ok(Self::Arca),
            "BATS" => Ok(Self::Bats),
            "IEX" => Ok(Self::Iex),
            "OTC" => Ok(Self::Otc),
            _ => Err(FormatError::UnknownVenue {
                value: input.to_owned(),
            }),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Nyse => "NYSE",
            Self::Nsdq => "NSDQ",
            Self::Arca => "ARCA",
            Self::Bats => "BATS",
            Self::Iex => "IEX",
            Self::Otc => "OTC",
        }
    }
}

impl Display for Venue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
