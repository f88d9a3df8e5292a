pub mod error;
pub mod input;
pub mod time_value;
pub mod types;

#[cfg(feature = "calculators")]
pub mod calculators;

#[cfg(feature = "analytics")]
pub mod analytics;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "metrics")]
pub mod snapshot;

pub use error::FinwiseError;
pub use types::*;

/// Standard result type for all finwise operations
pub type FinwiseResult<T> = Result<T, FinwiseError>;
