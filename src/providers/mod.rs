pub mod banco_central;
pub mod mindicador;
pub mod sbif;

pub use banco_central::BancoCentralSource;
pub use mindicador::MindicadorSource;
pub use sbif::SbifSource;

use std::time::Duration;

pub(crate) const USER_AGENT: &str = "ufx/0.1";

/// Per-request deadline for a value fetch.
pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-request deadline for an availability probe.
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
