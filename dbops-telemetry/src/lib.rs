//! Structured logging for the DBOps provisioner.
//!
//! Development runs log pretty-printed events to the terminal. Staging and
//! production runs write JSON lines to daily-rotated files under `logs/`,
//! tagged with the id of the account being provisioned.

mod logging;

pub use logging::*;
