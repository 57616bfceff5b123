//! Core business logic abstractions

pub mod cache;
pub mod convert;
pub mod log;
pub mod quote;
pub mod source;

// Re-export main types for cleaner imports
pub use cache::Cache;
pub use convert::{Conversion, CurrencyUnit};
pub use quote::{CACHE_TTL, UF_DEFAULT, UfQuote, UfSourceId};
pub use source::{SourceError, UfSource};
