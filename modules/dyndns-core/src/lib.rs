//! The Dynamic DNS control plane core: domain model, Alias Engine (C6),
//! Storage Port (C1), DNS Provisioner trait + Registry (C4/C5), and the
//! HTTP Surface (C7). `apps/dyndns-server` is the composition root that
//! wires these together into a running daemon.

pub mod api;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
