//! Kubernetes integration for the operator.
//!
//! This module contains the abstraction used by the provisioning strategies
//! to manage the namespaces and deployments backing each logical database.
//! Consumers should depend on the trait [`K8sClient`] and avoid relying on a
//! specific transport.
//!
//! The default client, [`http::HttpK8sClient`], is backed by the [`kube`]
//! crate and talks to the cluster either through an explicitly configured
//! endpoint with static certificate paths, or through the ambient
//! configuration (in-cluster or local `~/.kube/config`). Keeping the
//! abstraction in [`base`] lets us swap implementations in tests.
//!
//! See [`base`] for errors, error-kind classification, and the client trait.

mod base;
pub mod http;

pub use base::*;
