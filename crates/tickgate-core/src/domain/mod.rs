//! Canonical tick domain models and value newtypes.

mod symbol;
mod tick;
mod timestamp;
mod venue;

pub use symbol::Symbol;
pub use tick::{Quality, RawTick, ValidatedTick};
pub use timestamp::UtcDateTime;
pub use venue::Venue;
