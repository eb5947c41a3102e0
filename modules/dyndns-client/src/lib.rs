//! Daemon Client (C8) and Sync Engine (C9): the two pieces `dyndns-cli`
//! composes into a working client. `spec.md` §4.8/§4.9.

pub mod client;
pub mod sync;

pub use client::{AliasDto, ClientError, DaemonClient, DomainDto, HttpDaemonClient};
pub use sync::{discover_public_ip, synchronize, IpDiscoveryError, SyncOutcome};
