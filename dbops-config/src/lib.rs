//! Configuration management for the DBOps provisioner.
//!
//! Provides environment detection, layered configuration loading from YAML
//! files and `APP_` environment variables, and the shared configuration types
//! used by the operator binary.

mod environment;
mod load;
pub mod shared;

pub use environment::*;
pub use load::*;
