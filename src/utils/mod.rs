//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, the injected clock and helper
//! functions.

pub mod clock;
pub mod errors;
pub mod helpers;
pub mod logging;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ApiError, ErrorKind, PromoFlowError, Result};
