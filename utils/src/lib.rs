//! Shared utilities for ChainBadge.

pub mod display;
pub mod logging;

pub use display::{format_micro_units, short_address, MICRO_UNITS};
pub use logging::{init_logging, LogFormat};
