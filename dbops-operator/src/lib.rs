//! DBOps operator: provisions single-node key-value stores on Kubernetes.
//!
//! Each logical [`database::Database`] becomes a namespace holding a
//! deployment that runs the store, with a host directory isolated per
//! database. The [`strategy`] module drives the cluster calls through the
//! [`k8s::K8sClient`] abstraction; [`resources`] builds the objects.

pub mod database;
pub mod k8s;
pub mod resources;
pub mod strategy;
