mod account;
mod base;
mod kubernetes;
mod operator;
mod provisioning;
mod sentry;
mod store;

pub use account::*;
pub use base::*;
pub use kubernetes::*;
pub use operator::*;
pub use provisioning::*;
pub use sentry::*;
pub use store::*;
